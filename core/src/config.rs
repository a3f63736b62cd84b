//! Game configuration
//!
//! This module re-exports shared types from tickbomb-types and provides
//! persistence and validation for GameConfig.

use std::path::{Path, PathBuf};

pub use tickbomb_types::{AudioSettings, GameConfig, GameMode, PromptOverrides, SpeechSettings};

use crate::error::ConfigError;

const APP_NAME: &str = "tickbomb";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// GameConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for GameConfig persistence and validation
pub trait GameConfigExt: Sized {
    /// Load from the platform config dir, creating the file with defaults
    /// when it does not exist yet.
    fn load() -> Result<Self, ConfigError>;

    /// Load from an explicit TOML file. Missing fields take their defaults.
    fn load_from(path: &Path) -> Result<Self, ConfigError>;

    /// Save to the platform config dir.
    fn store(&self) -> Result<(), ConfigError>;

    /// Save as TOML to an explicit file.
    fn store_to(&self, path: &Path) -> Result<(), ConfigError>;

    /// Where [`GameConfigExt::load`] reads from
    fn config_path() -> Result<PathBuf, ConfigError>;

    /// Reject values the engine cannot run with.
    fn validate(&self) -> Result<(), ConfigError>;
}

impl GameConfigExt for GameConfig {
    fn load() -> Result<Self, ConfigError> {
        let config: GameConfig = confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn store(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Store)
    }

    fn store_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let text = toml::to_string_pretty(self).map_err(ConfigError::SerializeToml)?;
        std::fs::write(path, text).map_err(|source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.seconds_per_player == 0 {
            return invalid("seconds_per_player", "must be at least 1");
        }
        if self.tick_ms == 0 {
            return invalid("tick_ms", "must be at least 1");
        }
        if self.min_players == 0 {
            return invalid("min_players", "must be at least 1");
        }
        if self.min_players > self.max_players {
            return Err(ConfigError::Invalid {
                field: "max_players",
                reason: format!(
                    "{} is below min_players ({})",
                    self.max_players, self.min_players
                ),
            });
        }
        if !(self.min_players..=self.max_players).contains(&self.default_players) {
            return Err(ConfigError::Invalid {
                field: "default_players",
                reason: format!(
                    "{} outside {}..={}",
                    self.default_players, self.min_players, self.max_players
                ),
            });
        }
        if self.speech.ms_per_char == 0 {
            return invalid("speech.ms_per_char", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.speech.pitch_jitter) {
            return invalid("speech.pitch_jitter", "must be within 0.0..=1.0");
        }
        if self.audio.volume > 100 {
            return invalid("audio.volume", "must be within 0..=100");
        }
        Ok(())
    }
}
