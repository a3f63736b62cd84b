pub mod audio;
pub mod config;
pub mod countdown;
pub mod error;
pub mod game;
pub mod prompts;
pub mod scheduler;
pub mod speech;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use audio::{AudioBackend, HeartbeatTone, SUCCESS_CHIME_HZ, SilentAudio};
pub use config::{GameConfig, GameConfigExt};
pub use countdown::{CountdownState, HeartbeatSchedule, TickOutcome, TickReport, Urgency, UrgencyClock};
pub use error::{BackendError, ConfigError, GameError};
pub use game::{BombGame, GameSignal, GameState, SignalHandler};
pub use prompts::{PromptBank, PromptSource};
pub use scheduler::{RealtimeDriver, Scheduler, TaskHandle, VirtualClock};
pub use speech::{NoSpeech, SpeechBackend, SpeechEngine, SpeechSession, Utterance, Voice, VoiceSelector};
pub use tickbomb_types::{GameMode, ModePreset, PhaseStyle, PresentationPhase};
