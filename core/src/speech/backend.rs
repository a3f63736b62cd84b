//! Speech output capability

use crate::error::BackendError;

/// A voice offered by the platform synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag as reported by the platform (e.g. "ja-JP")
    pub language: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// One chunk of speech handed to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    /// Rate multiplier, 1.0 = backend normal
    pub rate: f64,
    /// Pitch multiplier in [0.5, 2.0], 1.0 = backend normal
    pub pitch: f64,
    /// 0.0 (silent) to 1.0
    pub volume: f64,
    /// None lets the backend pick its default voice
    pub voice: Option<Voice>,
}

/// Platform speech synthesizer.
///
/// Only one utterance is live at a time; callers cancel before speaking.
pub trait SpeechBackend {
    /// False when the platform has no speech capability. The engine then
    /// treats every request as a no-op.
    fn is_available(&self) -> bool;

    fn voices(&self) -> Result<Vec<Voice>, BackendError>;

    fn speak(&self, utterance: &Utterance) -> Result<(), BackendError>;

    /// Cut off the utterance currently playing, if any.
    fn cancel(&self) -> Result<(), BackendError>;
}

/// Backend for platforms without speech.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeech;

impl SpeechBackend for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn voices(&self) -> Result<Vec<Voice>, BackendError> {
        Ok(Vec::new())
    }

    fn speak(&self, _utterance: &Utterance) -> Result<(), BackendError> {
        Err(BackendError::Unavailable)
    }

    fn cancel(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
