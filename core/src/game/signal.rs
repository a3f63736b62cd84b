use tickbomb_types::{GameMode, PresentationPhase};

use crate::countdown::Urgency;

/// Signals emitted by the game as rounds progress.
/// Presentation layers render from these instead of polling.
#[derive(Debug, Clone, PartialEq)]
pub enum GameSignal {
    /// A round entered Active, either from setup or by restart
    RoundStarted {
        round: u32,
        players: u32,
        total_secs: u32,
        mode: GameMode,
        prompt: String,
    },

    /// One countdown second passed without running out
    Tick {
        elapsed: u32,
        remaining: u32,
        urgency: Urgency,
        phase: PresentationPhase,
    },

    /// The presentation phase moved up a step on this tick
    PhaseChanged {
        from: PresentationPhase,
        to: PresentationPhase,
    },

    PromptAdvanced {
        prompt: String,
    },

    SpeechToggled {
        enabled: bool,
    },

    /// The countdown ran out. Emitted exactly once per round.
    Exploded {
        round: u32,
    },

    ReturnedToSetup,
}

/// Trait for systems that react to game signals.
/// Implement this for terminal views, loggers, recorders, etc.
///
/// Handlers run while the game is mid-transition and must not call back
/// into it.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &GameSignal);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[GameSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
