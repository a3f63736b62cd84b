//! Best-effort voice selection
//!
//! Ranking, first match wins:
//! 1. A preferred name (priority order, substring match)
//! 2. A name containing a female hint (case-insensitive)
//! 3. Any voice in the target language
//! 4. None: the backend default

use tickbomb_types::SpeechSettings;

use super::Voice;

#[derive(Debug, Clone)]
pub struct VoiceSelector {
    language: String,
    preferred: Vec<String>,
    /// Stored lowercase
    female_hints: Vec<String>,
}

impl VoiceSelector {
    pub fn new(language: &str, preferred: Vec<String>, female_hints: &[String]) -> Self {
        Self {
            language: language.to_string(),
            preferred,
            female_hints: female_hints.iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(
            &settings.voice_language,
            settings.preferred_voices.clone(),
            &settings.female_hints,
        )
    }

    pub fn select<'a>(&self, voices: &'a [Voice]) -> Option<&'a Voice> {
        let candidates: Vec<&Voice> = voices
            .iter()
            .filter(|voice| voice.language.starts_with(&self.language))
            .collect();

        for name in &self.preferred {
            let found = candidates
                .iter()
                .find(|v| v.name.contains(name.as_str()))
                .copied();
            if found.is_some() {
                return found;
            }
        }

        candidates
            .iter()
            .find(|v| self.sounds_female(&v.name))
            .or_else(|| candidates.first())
            .copied()
    }

    fn sounds_female(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.female_hints.iter().any(|hint| name.contains(hint.as_str()))
    }
}
