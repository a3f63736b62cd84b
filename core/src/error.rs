//! Error types for engine operations

use std::path::PathBuf;
use thiserror::Error;

use crate::game::GameState;

/// Errors from the countdown-to-explosion state machine
#[derive(Debug, Error)]
pub enum GameError {
    #[error("countdown duration must be positive (got {total_secs}s)")]
    InvalidDuration { total_secs: u32 },

    #[error("player count {count} outside allowed range {min}..={max}")]
    InvalidPlayerCount { count: u32, min: u32, max: u32 },

    #[error("cannot {action} while {from}")]
    InvalidTransition { from: GameState, action: &'static str },

    #[error("invalid game configuration")]
    Config(#[from] ConfigError),
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Store(#[source] confy::ConfyError),

    #[error("failed to locate configuration file")]
    Locate(#[source] confy::ConfyError),

    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write config file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config")]
    SerializeToml(#[source] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors reported by audio and speech backends.
///
/// The engine never propagates these: sound is best-effort.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("speech capability unavailable")]
    Unavailable,

    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("synthesis failed: {0}")]
    Synthesis(String),
}
