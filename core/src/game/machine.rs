//! Round lifecycle and the countdown tick

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tickbomb_types::{GameConfig, GameMode, PresentationPhase};
use tracing::{debug, info};

use crate::audio::AudioBackend;
use crate::config::GameConfigExt;
use crate::countdown::{CountdownState, HeartbeatSchedule, TickOutcome, Urgency, UrgencyClock};
use crate::error::GameError;
use crate::prompts::PromptSource;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::speech::SpeechEngine;

use super::{GameSignal, GameState, SignalHandler};

/// The bomb game. Owns the round, its timers and the backends they drive.
///
/// All methods are cheap and synchronous; time only moves when the shared
/// [`Scheduler`] fires the tick this game arms.
pub struct BombGame {
    inner: Rc<RefCell<GameInner>>,
    /// Set when a tick fires while the game is borrowed (a handler moved
    /// the clock); the tick runs as soon as the borrow is released.
    missed_tick: Rc<Cell<bool>>,
}

/// Everything a single Active period owns
struct Round {
    number: u32,
    clock: UrgencyClock,
    tick: Option<TaskHandle>,
    prompt: String,
    phase: PresentationPhase,
}

struct GameInner {
    config: GameConfig,
    scheduler: Rc<dyn Scheduler>,
    audio: Rc<dyn AudioBackend>,
    speech: SpeechEngine,
    prompts: Box<dyn PromptSource>,
    handlers: Vec<Box<dyn SignalHandler>>,

    state: GameState,
    player_count: u32,
    mode: GameMode,
    speech_enabled: bool,
    rounds_played: u32,
    round: Option<Round>,
    missed_tick: Rc<Cell<bool>>,

    /// Handed to tick tasks so a dropped game ignores late ticks
    this: Weak<RefCell<GameInner>>,
}

impl BombGame {
    pub fn new(
        config: GameConfig,
        scheduler: Rc<dyn Scheduler>,
        audio: Rc<dyn AudioBackend>,
        speech: SpeechEngine,
        prompts: Box<dyn PromptSource>,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let missed_tick = Rc::new(Cell::new(false));
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(GameInner {
                player_count: config.default_players,
                mode: config.default_mode,
                speech_enabled: config.speech.enabled,
                config,
                scheduler,
                audio,
                speech,
                prompts,
                handlers: Vec::new(),
                state: GameState::Setup,
                rounds_played: 0,
                round: None,
                missed_tick: Rc::clone(&missed_tick),
                this: this.clone(),
            })
        });
        Ok(Self { inner, missed_tick })
    }

    pub fn add_handler(&self, handler: Box<dyn SignalHandler>) {
        self.inner.borrow_mut().handlers.push(handler);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Setup → Active with `player_count` players.
    pub fn start(&self, player_count: u32, mode: GameMode) -> Result<(), GameError> {
        let result = self.inner.borrow_mut().start(player_count, mode);
        self.run_missed_tick();
        result
    }

    /// Serve the next prompt ("clear, next"). Returns the new prompt.
    pub fn advance_prompt(&self) -> Result<String, GameError> {
        let result = self.inner.borrow_mut().advance_prompt();
        self.run_missed_tick();
        result
    }

    pub fn set_speech_enabled(&self, enabled: bool) -> Result<(), GameError> {
        let result = self.inner.borrow_mut().set_speech_enabled(enabled);
        self.run_missed_tick();
        result
    }

    /// Flip speech on or off. Returns the new setting.
    pub fn toggle_speech(&self) -> Result<bool, GameError> {
        let result = {
            let mut inner = self.inner.borrow_mut();
            let enabled = !inner.speech_enabled;
            inner.set_speech_enabled(enabled).map(|()| enabled)
        };
        self.run_missed_tick();
        result
    }

    /// Exploded → Active with the same players and mode.
    pub fn restart(&self) -> Result<(), GameError> {
        let result = self.inner.borrow_mut().restart();
        self.run_missed_tick();
        result
    }

    /// Active or Exploded → Setup.
    pub fn home(&self) -> Result<(), GameError> {
        let result = self.inner.borrow_mut().home();
        self.run_missed_tick();
        result
    }

    fn run_missed_tick(&self) {
        run_missed_ticks(&self.inner, &self.missed_tick);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.inner.borrow().state
    }

    pub fn player_count(&self) -> u32 {
        self.inner.borrow().player_count
    }

    pub fn mode(&self) -> GameMode {
        self.inner.borrow().mode
    }

    pub fn speech_enabled(&self) -> bool {
        self.inner.borrow().speech_enabled
    }

    /// Number of the current (or last) round since `start`
    pub fn round_number(&self) -> u32 {
        self.inner.borrow().rounds_played
    }

    /// Prompt on screen, if a round has been played since setup
    pub fn prompt(&self) -> Option<String> {
        self.inner.borrow().round.as_ref().map(|r| r.prompt.clone())
    }

    pub fn countdown(&self) -> Option<CountdownState> {
        self.inner.borrow().round.as_ref().map(|r| r.clock.countdown())
    }

    /// Current urgency; calm outside a round
    pub fn urgency(&self) -> Urgency {
        self.inner
            .borrow()
            .round
            .as_ref()
            .map_or(Urgency::CALM, |r| r.clock.urgency())
    }

    pub fn phase(&self) -> PresentationPhase {
        self.urgency().phase()
    }

    pub fn heartbeat(&self) -> Option<HeartbeatSchedule> {
        self.inner.borrow().round.as_ref().and_then(|r| r.clock.heartbeat())
    }

    pub fn config(&self) -> GameConfig {
        self.inner.borrow().config.clone()
    }
}

impl GameInner {
    fn require(&self, allowed: &[GameState], action: &'static str) -> Result<(), GameError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn new_clock(&self, player_count: u32) -> Result<UrgencyClock, GameError> {
        UrgencyClock::new(
            self.config.total_seconds(player_count),
            Rc::clone(&self.scheduler),
            Rc::clone(&self.audio),
        )
    }

    fn start(&mut self, player_count: u32, mode: GameMode) -> Result<(), GameError> {
        self.require(&[GameState::Setup], "start")?;

        let (min, max) = (self.config.min_players, self.config.max_players);
        if !(min..=max).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount {
                count: player_count,
                min,
                max,
            });
        }
        let clock = self.new_clock(player_count)?;

        // First user gesture: unlock output before anything plays
        self.audio.unlock();
        self.speech.prime();
        self.prompts.reset_history();

        self.player_count = player_count;
        self.mode = mode;
        self.rounds_played = 0;
        self.enter_active(clock);
        Ok(())
    }

    fn restart(&mut self) -> Result<(), GameError> {
        self.require(&[GameState::Exploded], "restart")?;
        let clock = self.new_clock(self.player_count)?;
        self.enter_active(clock);
        Ok(())
    }

    fn enter_active(&mut self, mut clock: UrgencyClock) {
        self.teardown_round();

        let first = clock.start();
        let prompt = self.prompts.next_prompt(self.mode);
        let total_secs = clock.countdown().total();

        self.rounds_played += 1;
        self.speech_enabled = self.config.speech.enabled;
        self.state = GameState::Active;
        self.round = Some(Round {
            number: self.rounds_played,
            clock,
            tick: None,
            prompt: prompt.clone(),
            phase: first.phase,
        });

        info!(
            round = self.rounds_played,
            players = self.player_count,
            total_secs,
            mode = %self.mode,
            "round started"
        );
        self.emit(GameSignal::RoundStarted {
            round: self.rounds_played,
            players: self.player_count,
            total_secs,
            mode: self.mode,
            prompt: prompt.clone(),
        });

        if self.speech_enabled {
            self.speech.speak(&prompt, self.mode);
        }
        self.arm_tick();
    }

    fn advance_prompt(&mut self) -> Result<String, GameError> {
        self.require(&[GameState::Active], "advance the prompt")?;

        self.speech.stop();
        let prompt = self.prompts.next_prompt(self.mode);
        self.audio.play_success();

        let changed = match self.round.as_mut() {
            Some(round) => {
                let previous = std::mem::replace(&mut round.prompt, prompt.clone());
                previous != prompt
            }
            None => true,
        };
        debug!(changed, "prompt advanced");
        self.emit(GameSignal::PromptAdvanced {
            prompt: prompt.clone(),
        });

        if changed && self.speech_enabled {
            self.speech.speak(&prompt, self.mode);
        }
        Ok(prompt)
    }

    fn set_speech_enabled(&mut self, enabled: bool) -> Result<(), GameError> {
        self.require(&[GameState::Active], "toggle speech")?;

        if !enabled {
            self.speech.stop();
        }
        self.speech_enabled = enabled;
        debug!(enabled, "speech toggled");
        self.emit(GameSignal::SpeechToggled { enabled });
        Ok(())
    }

    fn home(&mut self) -> Result<(), GameError> {
        self.require(&[GameState::Active, GameState::Exploded], "return home")?;

        self.teardown_round();
        self.speech.stop();
        self.state = GameState::Setup;
        debug!("returned to setup");
        self.emit(GameSignal::ReturnedToSetup);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Countdown
    // ─────────────────────────────────────────────────────────────────────────

    fn arm_tick(&mut self) {
        let this = self.this.clone();
        let missed = Rc::clone(&self.missed_tick);
        let handle = self.scheduler.schedule(
            Duration::from_millis(self.config.tick_ms),
            Box::new(move || {
                let Some(inner) = this.upgrade() else {
                    return;
                };
                match inner.try_borrow_mut() {
                    Ok(mut game) => game.on_tick(),
                    Err(_) => {
                        debug!("tick fired while the game was busy, deferred");
                        missed.set(true);
                        return;
                    }
                };
                run_missed_ticks(&inner, &missed);
            }),
        );
        if let Some(round) = self.round.as_mut() {
            round.tick = Some(handle);
        }
    }

    fn on_tick(&mut self) {
        if self.state != GameState::Active {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.tick = None;

        match round.clock.tick() {
            TickOutcome::Ticked(report) => {
                let previous = std::mem::replace(&mut round.phase, report.phase);
                if previous != report.phase {
                    debug!(from = ?previous, to = ?report.phase, "phase changed");
                    self.emit(GameSignal::PhaseChanged {
                        from: previous,
                        to: report.phase,
                    });
                }
                self.emit(GameSignal::Tick {
                    elapsed: report.elapsed,
                    remaining: report.remaining,
                    urgency: report.urgency,
                    phase: report.phase,
                });
                self.arm_tick();
            }
            TickOutcome::Expired => self.explode(),
            TickOutcome::Idle => {}
        }
    }

    fn explode(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if let Some(handle) = round.tick.take() {
            self.scheduler.cancel(handle);
        }
        let number = round.number;

        self.speech.stop();
        round.clock.halt();
        self.audio.play_explosion();
        self.state = GameState::Exploded;

        info!(round = number, players = self.player_count, "bomb exploded");
        self.emit(GameSignal::Exploded { round: number });
    }

    /// Cancel the tick and heartbeat of the current round, if any.
    fn teardown_round(&mut self) {
        self.missed_tick.set(false);
        if let Some(mut round) = self.round.take() {
            if let Some(handle) = round.tick.take() {
                self.scheduler.cancel(handle);
            }
            round.clock.halt();
        }
    }

    fn emit(&mut self, signal: GameSignal) {
        for handler in &mut self.handlers {
            handler.handle_signal(&signal);
        }
    }
}

/// Run ticks deferred while the game was borrowed. A deferred tick may
/// itself be interrupted, so keep going until none is left.
fn run_missed_ticks(inner: &RefCell<GameInner>, missed: &Cell<bool>) {
    while missed.get() {
        let Ok(mut game) = inner.try_borrow_mut() else {
            return;
        };
        missed.set(false);
        game.on_tick();
    }
}

impl Drop for GameInner {
    fn drop(&mut self) {
        self.teardown_round();
        self.speech.stop();
    }
}
