//! Prompt speech
//!
//! Splits a prompt at punctuation and speaks each segment on a timer, with a
//! pause after each one that depends on the mark that closed it.
//!
//! # Session rules
//!
//! - `speak` always supersedes whatever was in flight
//! - `stop` is the single cancellation primitive and is idempotent
//! - A segment only speaks if its session is still current, and cancels the
//!   previous utterance first, so at most one utterance is ever live
//! - A missing speech capability turns everything into a no-op

mod backend;
mod engine;
pub mod segment;
mod voice;


pub use backend::{NoSpeech, SpeechBackend, Utterance, Voice};
pub use engine::{MAX_PITCH, MIN_PITCH, SpeechEngine, SpeechSession};
pub use segment::{Segment, plan, split_segments};
pub use voice::VoiceSelector;
