//! Tests for BombGame transitions, driven end to end on a VirtualClock

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tickbomb_types::{GameConfig, GameMode, PresentationPhase, SpeechSettings};

use super::{BombGame, GameSignal, GameState, SignalHandler};
use crate::audio::AudioBackend;
use crate::error::GameError;
use crate::prompts::{PromptBank, PromptSource};
use crate::scheduler::VirtualClock;
use crate::speech::{SpeechBackend, SpeechEngine};
use crate::test_support::{RecordingAudio, RecordingSpeech, Sound, SpeechCall, virtual_clock};

// ─────────────────────────────────────────────────────────────────────────────
// Harness
// ─────────────────────────────────────────────────────────────────────────────

struct SignalLog(Rc<RefCell<Vec<GameSignal>>>);

impl SignalHandler for SignalLog {
    fn handle_signal(&mut self, signal: &GameSignal) {
        self.0.borrow_mut().push(signal.clone());
    }
}

/// Serves prompts from a fixed script, cycling, and counts history resets.
struct ScriptedPrompts {
    script: Vec<&'static str>,
    next: usize,
    resets: Rc<Cell<usize>>,
}

impl PromptSource for ScriptedPrompts {
    fn next_prompt(&mut self, _mode: GameMode) -> String {
        let prompt = self.script[self.next % self.script.len()];
        self.next += 1;
        prompt.to_string()
    }

    fn reset_history(&mut self) {
        self.resets.set(self.resets.get() + 1);
    }
}

struct Harness {
    clock: Rc<VirtualClock>,
    audio: Rc<RecordingAudio>,
    speech: Rc<RecordingSpeech>,
    signals: Rc<RefCell<Vec<GameSignal>>>,
    resets: Rc<Cell<usize>>,
    game: BombGame,
}

impl Harness {
    fn new() -> Self {
        Self::scripted(vec!["問題です。次は？答えろ！", "右隣の人を見つめろ！", "叫べ！"])
    }

    fn scripted(script: Vec<&'static str>) -> Self {
        let resets = Rc::new(Cell::new(0));
        let prompts = ScriptedPrompts {
            script,
            next: 0,
            resets: Rc::clone(&resets),
        };
        Self::build(GameConfig::default(), Box::new(prompts), resets)
    }

    fn build(config: GameConfig, prompts: Box<dyn PromptSource>, resets: Rc<Cell<usize>>) -> Self {
        let (clock, scheduler) = virtual_clock();
        let audio = Rc::new(RecordingAudio::default());
        let speech = Rc::new(RecordingSpeech::new());

        let speech_backend: Rc<dyn SpeechBackend> = speech.clone();
        let engine = SpeechEngine::with_rng(
            Rc::clone(&scheduler),
            speech_backend,
            SpeechSettings::default(),
            Box::new(ChaCha8Rng::seed_from_u64(9)),
        );
        let audio_backend: Rc<dyn AudioBackend> = audio.clone();
        let game = BombGame::new(config, scheduler, audio_backend, engine, prompts).unwrap();

        let signals = Rc::new(RefCell::new(Vec::new()));
        game.add_handler(Box::new(SignalLog(Rc::clone(&signals))));

        Self {
            clock,
            audio,
            speech,
            signals,
            resets,
            game,
        }
    }

    fn secs(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }

    fn count(&self, matches: impl Fn(&GameSignal) -> bool) -> usize {
        self.signals.borrow().iter().filter(|s| matches(s)).count()
    }

    fn explosions(&self) -> usize {
        self.count(|s| matches!(s, GameSignal::Exploded { .. }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn four_players_explode_exactly_once_after_sixty_seconds() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    assert_eq!(h.game.countdown().unwrap().total(), 60);

    h.secs(59);
    assert_eq!(h.game.state(), GameState::Active);
    assert_eq!(h.explosions(), 0);
    assert_eq!(h.game.countdown().unwrap().remaining(), 1);

    h.secs(1);
    assert_eq!(h.game.state(), GameState::Exploded);
    assert_eq!(h.explosions(), 1);
    assert_eq!(h.game.countdown().unwrap().elapsed(), 60);

    h.secs(30);
    assert_eq!(h.explosions(), 1);
    assert_eq!(h.audio.count(&Sound::Explosion), 1);
    // Tick, heartbeat and speech timers are all gone
    assert_eq!(h.clock.pending(), 0);
    assert!(h.game.heartbeat().is_none());
}

#[test]
fn ticks_report_each_second_until_expiry() {
    let h = Harness::new();
    h.game.start(2, GameMode::Friend).unwrap();
    h.secs(30);

    let ticks: Vec<(u32, u32)> = h
        .signals
        .borrow()
        .iter()
        .filter_map(|s| match s {
            GameSignal::Tick {
                elapsed, remaining, ..
            } => Some((*elapsed, *remaining)),
            _ => None,
        })
        .collect();

    assert_eq!(ticks.len(), 29);
    assert_eq!(ticks.first(), Some(&(1, 29)));
    assert_eq!(ticks.last(), Some(&(29, 1)));
    assert!(matches!(
        h.signals.borrow().last(),
        Some(GameSignal::Exploded { round: 1 })
    ));
}

#[test]
fn phases_escalate_in_order_once_each() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    assert_eq!(h.game.phase(), PresentationPhase::Calm);
    h.secs(60);

    let changes: Vec<(PresentationPhase, PresentationPhase)> = h
        .signals
        .borrow()
        .iter()
        .filter_map(|s| match s {
            GameSignal::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();

    assert_eq!(
        changes,
        vec![
            (PresentationPhase::Calm, PresentationPhase::Warning),
            (PresentationPhase::Warning, PresentationPhase::Critical),
            (PresentationPhase::Critical, PresentationPhase::Panic),
        ]
    );
}

#[test]
fn start_unlocks_output_and_plays_first_beat() {
    let h = Harness::new();
    h.game.start(3, GameMode::Pink).unwrap();

    let sounds = h.audio.sounds.borrow();
    assert_eq!(sounds[0], Sound::Unlock);
    assert_eq!(sounds[1], Sound::Heartbeat(0.0));

    // Silent priming utterance precedes the prompt
    let utterances = h.speech.utterances();
    assert_eq!(utterances[0].volume, 0.0);

    assert_eq!(h.game.mode(), GameMode::Pink);
    assert_eq!(h.game.player_count(), 3);
    assert_eq!(h.game.round_number(), 1);
    assert_eq!(h.resets.get(), 1);
}

#[test]
fn round_start_speaks_prompt_and_announces_it() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    h.secs(5);

    assert_eq!(h.game.prompt().as_deref(), Some("問題です。次は？答えろ！"));
    assert_eq!(h.speech.spoken()[1..], ["問題です。", "次は？", "答えろ！"]);
    assert!(matches!(
        &h.signals.borrow()[0],
        GameSignal::RoundStarted { round: 1, players: 4, total_secs: 60, mode: GameMode::Friend, prompt }
            if prompt == "問題です。次は？答えろ！"
    ));
}

#[test]
fn restart_resets_countdown_with_fresh_prompt() {
    let h = Harness::new();
    h.game.start(2, GameMode::Friend).unwrap();
    let first_prompt = h.game.prompt();
    h.secs(30);
    assert_eq!(h.game.state(), GameState::Exploded);

    h.game.restart().unwrap();
    assert_eq!(h.game.state(), GameState::Active);
    assert_eq!(h.game.countdown().unwrap().elapsed(), 0);
    assert_eq!(h.game.urgency().value(), 0.0);
    assert_ne!(h.game.prompt(), first_prompt);
    assert_eq!(h.game.round_number(), 2);

    h.secs(30);
    assert_eq!(h.explosions(), 2);
    assert!(matches!(
        h.signals.borrow().last(),
        Some(GameSignal::Exploded { round: 2 })
    ));
}

#[test]
fn prompt_history_resets_only_at_start() {
    let h = Harness::new();
    h.game.start(2, GameMode::Friend).unwrap();
    assert_eq!(h.resets.get(), 1);

    h.secs(30);
    h.game.restart().unwrap();
    h.secs(30);
    assert_eq!(h.resets.get(), 1);

    h.game.home().unwrap();
    assert_eq!(h.resets.get(), 1);
    h.game.start(2, GameMode::Pink).unwrap();
    assert_eq!(h.resets.get(), 2);
    assert_eq!(h.game.round_number(), 1);
}

#[test]
fn home_from_active_leaves_no_pending_timers() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    h.secs(10);
    assert!(h.clock.pending() > 0);

    h.game.home().unwrap();
    assert_eq!(h.game.state(), GameState::Setup);
    assert_eq!(h.clock.pending(), 0);
    assert!(h.game.prompt().is_none());
    assert!(matches!(h.signals.borrow().last(), Some(GameSignal::ReturnedToSetup)));

    let beats = h.audio.heartbeats();
    h.secs(120);
    assert_eq!(h.audio.heartbeats(), beats);
    assert_eq!(h.explosions(), 0);
}

#[test]
fn home_from_exploded_returns_to_setup() {
    let h = Harness::new();
    h.game.start(2, GameMode::Friend).unwrap();
    h.secs(30);
    h.game.home().unwrap();
    assert_eq!(h.game.state(), GameState::Setup);
    assert_eq!(h.game.urgency().value(), 0.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompts and speech
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn advance_prompt_chimes_and_speaks_new_prompt() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    h.clock.advance(Duration::ZERO);

    let prompt = h.game.advance_prompt().unwrap();
    assert_eq!(prompt, "右隣の人を見つめろ！");
    assert_eq!(h.audio.count(&Sound::Success), 1);
    assert_eq!(
        h.count(|s| matches!(s, GameSignal::PromptAdvanced { prompt } if prompt == "右隣の人を見つめろ！")),
        1
    );

    h.secs(10);
    // First prompt was cut off after its first segment
    assert_eq!(h.speech.spoken()[1..], ["問題です。", "右隣の人を見つめろ！"]);
}

#[test]
fn unchanged_prompt_is_not_spoken_again() {
    let h = Harness::scripted(vec!["叫べ！"]);
    h.game.start(4, GameMode::Friend).unwrap();
    h.secs(1);
    let spoken = h.speech.spoken().len();

    h.game.advance_prompt().unwrap();
    h.secs(5);
    assert_eq!(h.speech.spoken().len(), spoken);
    assert_eq!(h.audio.count(&Sound::Success), 1);
}

#[test]
fn disabling_speech_stops_it_and_keeps_later_prompts_silent() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    h.clock.advance(Duration::ZERO);

    h.game.set_speech_enabled(false).unwrap();
    assert!(!h.game.speech_enabled());
    assert!(matches!(h.speech.calls.borrow().last(), Some(SpeechCall::Cancel)));

    h.game.advance_prompt().unwrap();
    h.secs(10);
    assert_eq!(h.speech.spoken()[1..], ["問題です。"]);

    // Re-enabling does not replay the current prompt
    assert!(h.game.toggle_speech().unwrap());
    h.secs(10);
    assert_eq!(h.speech.spoken()[1..], ["問題です。"]);
    assert_eq!(h.count(|s| matches!(s, GameSignal::SpeechToggled { .. })), 2);
}

#[test]
fn explosion_cuts_off_speech() {
    let mut config = GameConfig::default();
    config.seconds_per_player = 1;
    let resets = Rc::new(Cell::new(0));
    let prompts = ScriptedPrompts {
        script: vec!["一つ目。二つ目。三つ目。四つ目。"],
        next: 0,
        resets: Rc::clone(&resets),
    };
    let h = Harness::build(config, Box::new(prompts), resets);

    // Segments start at 0 ms, ~1045 ms, ~2091 ms; the bomb goes off at 2000 ms
    h.game.start(2, GameMode::Friend).unwrap();
    h.secs(2);
    assert_eq!(h.game.state(), GameState::Exploded);

    h.secs(30);
    assert_eq!(h.speech.spoken()[1..], ["一つ目。", "二つ目。"]);
}

#[test]
fn prompt_bank_drives_a_real_round() {
    let resets = Rc::new(Cell::new(0));
    let bank = PromptBank::with_rng(Box::new(ChaCha8Rng::seed_from_u64(5)));
    let h = Harness::build(GameConfig::default(), Box::new(bank), resets);
    h.game.start(2, GameMode::Pink).unwrap();

    let first = h.game.prompt().unwrap();
    let next = h.game.advance_prompt().unwrap();
    assert_ne!(first, next);
    assert!(crate::prompts::PINK.contains(&next.as_str()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejected transitions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn player_count_outside_range_is_rejected() {
    let h = Harness::new();
    for count in [0, 1, 21] {
        let err = h.game.start(count, GameMode::Friend).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidPlayerCount { min: 2, max: 20, .. }
        ));
    }
    assert_eq!(h.game.state(), GameState::Setup);
    assert!(h.audio.sounds.borrow().is_empty());
    assert_eq!(h.clock.pending(), 0);
}

#[test]
fn invalid_transitions_change_nothing() {
    let h = Harness::new();
    assert!(matches!(
        h.game.restart(),
        Err(GameError::InvalidTransition { from: GameState::Setup, .. })
    ));
    assert!(h.game.home().is_err());
    assert!(h.game.advance_prompt().is_err());
    assert!(h.game.set_speech_enabled(false).is_err());
    assert!(h.signals.borrow().is_empty());

    h.game.start(2, GameMode::Friend).unwrap();
    assert!(h.game.start(2, GameMode::Friend).is_err());
    assert!(h.game.restart().is_err());
    assert_eq!(h.game.round_number(), 1);

    h.secs(30);
    assert!(h.game.advance_prompt().is_err());
    assert!(h.game.toggle_speech().is_err());
    assert_eq!(h.game.state(), GameState::Exploded);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let (_clock, scheduler) = virtual_clock();
    let mut config = GameConfig::default();
    config.seconds_per_player = 0;

    let audio: Rc<dyn AudioBackend> = Rc::new(RecordingAudio::default());
    let speech: Rc<dyn SpeechBackend> = Rc::new(RecordingSpeech::new());
    let engine = SpeechEngine::new(Rc::clone(&scheduler), speech, SpeechSettings::default());
    let result = BombGame::new(config, scheduler, audio, engine, Box::new(PromptBank::new()));
    assert!(matches!(result, Err(GameError::Config(_))));
}

#[test]
fn dropping_the_game_cancels_its_timers() {
    let h = Harness::new();
    h.game.start(4, GameMode::Friend).unwrap();
    h.secs(3);

    let Harness {
        clock, audio, game, ..
    } = h;
    drop(game);
    assert_eq!(clock.pending(), 0);

    let beats = audio.heartbeats();
    clock.advance(Duration::from_secs(120));
    assert_eq!(audio.heartbeats(), beats);
}

// ─────────────────────────────────────────────────────────────────────────────
// Time moving inside a handler
// ─────────────────────────────────────────────────────────────────────────────

/// Advances the clock while the game is still emitting `PromptAdvanced`.
struct StallOnAdvance {
    clock: Rc<VirtualClock>,
    by: Duration,
}

impl SignalHandler for StallOnAdvance {
    fn handle_signal(&mut self, signal: &GameSignal) {
        if matches!(signal, GameSignal::PromptAdvanced { .. }) {
            self.clock.advance(self.by);
        }
    }
}

#[test]
fn tick_due_during_a_handler_runs_afterwards() {
    let h = Harness::new();
    h.game.add_handler(Box::new(StallOnAdvance {
        clock: Rc::clone(&h.clock),
        by: Duration::from_millis(1500),
    }));
    h.game.start(4, GameMode::Friend).unwrap();

    h.game.advance_prompt().unwrap();
    assert_eq!(h.clock.now(), Duration::from_millis(1500));
    assert_eq!(h.game.countdown().unwrap().elapsed(), 1);

    h.clock.advance(Duration::from_secs(600));
    assert_eq!(h.game.state(), GameState::Exploded);
    assert_eq!(h.explosions(), 1);
    assert_eq!(h.game.countdown().unwrap().elapsed(), 60);
    assert_eq!(h.clock.pending(), 0);
}
