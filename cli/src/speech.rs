//! Platform speech backends
//!
//! Linux shells out to `espeak`; other platforms use the `tts` crate.

#[cfg(target_os = "linux")]
pub use espeak::EspeakSpeech as PlatformSpeech;
#[cfg(not(target_os = "linux"))]
pub use native::NativeSpeech as PlatformSpeech;

/// espeak's default speed in words per minute, used as rate 1.0
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const ESPEAK_BASE_WPM: f64 = 175.0;

/// Map a rate multiplier onto espeak's `-s` range.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn espeak_speed(rate: f64) -> u32 {
    (ESPEAK_BASE_WPM * rate).round().clamp(80.0, 450.0) as u32
}

/// Map a pitch multiplier in [0.5, 2.0] onto espeak's `-p` range, 1.0 → 50.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn espeak_pitch(pitch: f64) -> u32 {
    (pitch * 50.0).round().clamp(0.0, 99.0) as u32
}

/// Map a volume in [0, 1] onto espeak's `-a` range, 1.0 → 100.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn espeak_amplitude(volume: f64) -> u32 {
    (volume * 100.0).round().clamp(0.0, 200.0) as u32
}

/// Parse `espeak --voices` output:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  ja              --/M      Japanese           zls/ja
/// ```
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_espeak_voices(listing: &str) -> Vec<tickbomb_core::Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_, language, _, name, ..] => Some(tickbomb_core::Voice::new(*name, *language)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(target_os = "linux")]
mod espeak {
    use std::cell::RefCell;
    use std::process::{Child, Command, Stdio};

    use tickbomb_core::{BackendError, SpeechBackend, Utterance, Voice};
    use tracing::debug;

    use super::{espeak_amplitude, espeak_pitch, espeak_speed, parse_espeak_voices};

    const PROGRAM: &str = "espeak";

    /// Speaks through an `espeak` child process. Cancelling kills the child.
    ///
    /// The voice list is read once at construction: it is asked for before
    /// every segment and listing spawns a process.
    pub struct EspeakSpeech {
        available: bool,
        voice_language: String,
        voices: Vec<Voice>,
        current: RefCell<Option<Child>>,
    }

    impl EspeakSpeech {
        pub fn new(voice_language: &str) -> Self {
            let available = Command::new(PROGRAM)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok_and(|status| status.success());
            if !available {
                debug!("espeak not found, speech disabled");
                return Self::with_voices(voice_language, None);
            }

            let voices = list_voices(voice_language).unwrap_or_else(|err| {
                debug!(error = %err, "failed to list espeak voices");
                Vec::new()
            });
            debug!(count = voices.len(), "espeak voices listed");
            Self::with_voices(voice_language, Some(voices))
        }

        /// `None` means espeak is unavailable.
        pub(super) fn with_voices(voice_language: &str, voices: Option<Vec<Voice>>) -> Self {
            Self {
                available: voices.is_some(),
                voice_language: voice_language.to_string(),
                voices: voices.unwrap_or_default(),
                current: RefCell::new(None),
            }
        }
    }

    fn list_voices(voice_language: &str) -> Result<Vec<Voice>, BackendError> {
        let output = Command::new(PROGRAM)
            .arg(format!("--voices={voice_language}"))
            .output()
            .map_err(|source| BackendError::Spawn {
                program: PROGRAM.to_string(),
                source,
            })?;
        Ok(parse_espeak_voices(&String::from_utf8_lossy(&output.stdout)))
    }

    impl SpeechBackend for EspeakSpeech {
        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Result<Vec<Voice>, BackendError> {
            if !self.available {
                return Err(BackendError::Unavailable);
            }
            Ok(self.voices.clone())
        }

        fn speak(&self, utterance: &Utterance) -> Result<(), BackendError> {
            if !self.available {
                return Err(BackendError::Unavailable);
            }
            // espeak needs no unlocking; skip the silent priming utterance
            if utterance.text.is_empty() {
                return Ok(());
            }

            let voice = match &utterance.voice {
                Some(voice) => voice.language.clone(),
                None => utterance
                    .language
                    .split('-')
                    .next()
                    .unwrap_or(self.voice_language.as_str())
                    .to_lowercase(),
            };

            let child = Command::new(PROGRAM)
                .args(["-v", &voice])
                .args(["-s", &espeak_speed(utterance.rate).to_string()])
                .args(["-p", &espeak_pitch(utterance.pitch).to_string()])
                .args(["-a", &espeak_amplitude(utterance.volume).to_string()])
                .arg("--")
                .arg(&utterance.text)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map_err(|source| BackendError::Spawn {
                    program: PROGRAM.to_string(),
                    source,
                })?;

            *self.current.borrow_mut() = Some(child);
            Ok(())
        }

        fn cancel(&self) -> Result<(), BackendError> {
            let Some(mut child) = self.current.borrow_mut().take() else {
                return Ok(());
            };
            // Already finished is fine
            if let Ok(None) = child.try_wait() {
                child.kill().map_err(|source| BackendError::Spawn {
                    program: PROGRAM.to_string(),
                    source,
                })?;
            }
            let _ = child.wait();
            Ok(())
        }
    }

    impl Drop for EspeakSpeech {
        fn drop(&mut self) {
            let _ = self.cancel();
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod native {
    use std::cell::RefCell;

    use tickbomb_core::{BackendError, SpeechBackend, Utterance, Voice};
    use tracing::debug;

    /// Speaks through the platform synthesizer via the `tts` crate.
    pub struct NativeSpeech {
        tts: RefCell<Option<tts::Tts>>,
    }

    impl NativeSpeech {
        pub fn new(_voice_language: &str) -> Self {
            let tts = match tts::Tts::default() {
                Ok(engine) => Some(engine),
                Err(err) => {
                    debug!(error = %err, "tts unavailable, speech disabled");
                    None
                }
            };
            Self {
                tts: RefCell::new(tts),
            }
        }
    }

    fn synthesis(err: tts::Error) -> BackendError {
        BackendError::Synthesis(err.to_string())
    }

    impl SpeechBackend for NativeSpeech {
        fn is_available(&self) -> bool {
            self.tts.borrow().is_some()
        }

        fn voices(&self) -> Result<Vec<Voice>, BackendError> {
            let tts = self.tts.borrow();
            let tts = tts.as_ref().ok_or(BackendError::Unavailable)?;
            let voices = tts.voices().map_err(synthesis)?;
            Ok(voices
                .iter()
                .map(|v| Voice::new(v.name(), v.language().to_string()))
                .collect())
        }

        fn speak(&self, utterance: &Utterance) -> Result<(), BackendError> {
            let mut tts = self.tts.borrow_mut();
            let tts = tts.as_mut().ok_or(BackendError::Unavailable)?;

            let features = tts.supported_features();
            if features.rate {
                let rate = tts.normal_rate() * utterance.rate as f32;
                tts.set_rate(rate.clamp(tts.min_rate(), tts.max_rate()))
                    .map_err(synthesis)?;
            }
            if features.pitch {
                let pitch = tts.normal_pitch() * utterance.pitch as f32;
                tts.set_pitch(pitch.clamp(tts.min_pitch(), tts.max_pitch()))
                    .map_err(synthesis)?;
            }
            if features.volume {
                let volume = tts.max_volume() * utterance.volume as f32;
                tts.set_volume(volume.clamp(tts.min_volume(), tts.max_volume()))
                    .map_err(synthesis)?;
            }
            if features.voice
                && let Some(wanted) = &utterance.voice
                && let Ok(voices) = tts.voices()
                && let Some(voice) = voices.iter().find(|v| v.name() == wanted.name)
            {
                tts.set_voice(voice).map_err(synthesis)?;
            }

            tts.speak(utterance.text.as_str(), true).map_err(synthesis)?;
            Ok(())
        }

        fn cancel(&self) -> Result<(), BackendError> {
            let mut tts = self.tts.borrow_mut();
            let tts = tts.as_mut().ok_or(BackendError::Unavailable)?;
            if tts.supported_features().stop {
                tts.stop().map_err(synthesis)?;
            }
            Ok(())
        }
    }
}
