//! Shared configuration types for tickbomb
//!
//! This crate contains serializable configuration and presentation types that
//! are shared between the engine (tickbomb-core) and front-ends (tickbomb-cli).

use serde::{Deserialize, Serialize};

/// RGBA color
pub type Color = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Game Modes
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt category and voice personality of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Embarrassing-confession prompts, bright voice
    #[default]
    Friend,
    /// Flirty prompts, softer voice with longer dramatic pauses
    Pink,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Friend, GameMode::Pink];

    /// Voice personality for this mode
    pub fn preset(&self) -> ModePreset {
        match self {
            GameMode::Friend => ModePreset {
                rate: 1.1,
                pitch: 1.2,
                pause_multiplier: 1.0,
            },
            GameMode::Pink => ModePreset {
                rate: 0.95,
                pitch: 1.35,
                pause_multiplier: 1.3,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Friend => "friend",
            GameMode::Pink => "pink",
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friend" => Ok(GameMode::Friend),
            "pink" => Ok(GameMode::Pink),
            other => Err(format!("unknown mode '{other}' (expected friend or pink)")),
        }
    }
}

/// Speech rate/pitch personality applied to every segment of a prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePreset {
    /// Speaking rate multiplier (1.0 = backend normal)
    pub rate: f64,
    /// Base pitch before per-segment jitter (1.0 = backend normal)
    pub pitch: f64,
    /// Multiplier applied to punctuation pauses
    pub pause_multiplier: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation Phases
// ─────────────────────────────────────────────────────────────────────────────

/// Discrete styling bucket derived from urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PresentationPhase {
    Calm,
    Warning,
    Critical,
    Panic,
}

impl PresentationPhase {
    /// Urgency above which the warning pulse starts
    pub const WARNING_ABOVE: f64 = 0.3;
    /// Urgency above which the critical blink starts
    pub const CRITICAL_ABOVE: f64 = 0.6;
    /// Urgency above which the panic blink starts
    pub const PANIC_ABOVE: f64 = 0.85;

    /// Bucket an urgency value. Thresholds are strict: exactly 0.3 is still calm.
    pub fn for_urgency(urgency: f64) -> Self {
        if urgency > Self::PANIC_ABOVE {
            PresentationPhase::Panic
        } else if urgency > Self::CRITICAL_ABOVE {
            PresentationPhase::Critical
        } else if urgency > Self::WARNING_ABOVE {
            PresentationPhase::Warning
        } else {
            PresentationPhase::Calm
        }
    }

    pub fn style(&self) -> PhaseStyle {
        use phase_colors::*;
        match self {
            PresentationPhase::Calm => PhaseStyle {
                background: (BOMB_DARK, NAVY),
                button: (EMERALD, GREEN),
                flash: Flash::None,
                shake: false,
            },
            PresentationPhase::Warning => PhaseStyle {
                background: (AMBER_SMOKE, BOMB_DARK),
                button: (YELLOW, AMBER),
                flash: Flash::Pulse,
                shake: false,
            },
            PresentationPhase::Critical => PhaseStyle {
                background: (RED_SMOKE, AMBER_DEEP),
                button: (RED, AMBER),
                flash: Flash::BlinkCritical,
                shake: false,
            },
            PresentationPhase::Panic => PhaseStyle {
                background: (RED_DEEP, RED_DARK),
                button: (RED, RED_STRONG),
                flash: Flash::BlinkPanic,
                shake: true,
            },
        }
    }
}

/// Flash animation layered over the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flash {
    None,
    /// Gentle pulse in the middle of the round
    Pulse,
    BlinkCritical,
    /// Rapid blink right before the explosion
    BlinkPanic,
}

impl Flash {
    pub fn animation_name(&self) -> Option<&'static str> {
        match self {
            Flash::None => None,
            Flash::Pulse => Some("pulse-warning"),
            Flash::BlinkCritical => Some("blink-critical"),
            Flash::BlinkPanic => Some("blink-panic"),
        }
    }
}

/// Complete styling for one presentation phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStyle {
    /// Background gradient (top, bottom)
    pub background: (Color, Color),
    /// "Next" button gradient (from, to)
    pub button: (Color, Color),
    pub flash: Flash,
    /// Whether the prompt text shakes
    pub shake: bool,
}

pub mod phase_colors {
    use super::Color;

    pub const BOMB_DARK: Color = [26, 26, 46, 255];
    pub const NAVY: Color = [22, 33, 62, 255];
    pub const AMBER_SMOKE: Color = [69, 26, 3, 153];
    pub const AMBER_DEEP: Color = [69, 26, 3, 255];
    pub const RED_SMOKE: Color = [69, 10, 10, 204];
    pub const RED_DEEP: Color = [69, 10, 10, 255];
    pub const RED_DARK: Color = [127, 29, 29, 255];
    pub const EMERALD: Color = [5, 150, 105, 255];
    pub const GREEN: Color = [22, 163, 74, 255];
    pub const YELLOW: Color = [202, 138, 4, 255];
    pub const AMBER: Color = [217, 119, 6, 255];
    pub const RED: Color = [220, 38, 38, 255];
    pub const RED_STRONG: Color = [185, 28, 28, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// Sound effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master enable for heartbeat, explosion and chime
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Volume level (0-100)
    #[serde(default = "default_audio_volume")]
    pub volume: u8,
}

fn default_audio_volume() -> u8 {
    80
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 80,
        }
    }
}

/// Text-to-speech settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Read prompts aloud when a round starts
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Language prefix used to filter voices (e.g. "ja")
    #[serde(default = "default_voice_language")]
    pub voice_language: String,

    /// Language tag set on every utterance
    #[serde(default = "default_utterance_language")]
    pub utterance_language: String,

    /// Voice names tried first, in priority order (substring match)
    #[serde(default = "default_preferred_voices")]
    pub preferred_voices: Vec<String>,

    /// Case-insensitive name fragments that suggest a female voice
    #[serde(default = "default_female_hints")]
    pub female_hints: Vec<String>,

    /// Estimated speaking time per character at rate 1.0
    #[serde(default = "default_ms_per_char")]
    pub ms_per_char: u32,

    /// Width of the uniform per-segment pitch wobble
    #[serde(default = "default_pitch_jitter")]
    pub pitch_jitter: f64,
}

fn default_voice_language() -> String {
    "ja".to_string()
}

fn default_utterance_language() -> String {
    "ja-JP".to_string()
}

fn default_preferred_voices() -> Vec<String> {
    [
        "Google 日本語",
        "Kyoko",
        "O-Ren",
        "Haruka",
        "Microsoft Nanami",
        "Nanami",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_female_hints() -> Vec<String> {
    ["female", "女", "kyoko", "haruka", "nanami", "misaki", "o-ren"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_ms_per_char() -> u32 {
    150
}

fn default_pitch_jitter() -> f64 {
    0.15
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            voice_language: default_voice_language(),
            utterance_language: default_utterance_language(),
            preferred_voices: default_preferred_voices(),
            female_hints: default_female_hints(),
            ms_per_char: default_ms_per_char(),
            pitch_jitter: default_pitch_jitter(),
        }
    }
}

/// Replacement prompt lists. An empty list keeps the built-in prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOverrides {
    #[serde(default)]
    pub friend: Vec<String>,
    #[serde(default)]
    pub pink: Vec<String>,
}

impl PromptOverrides {
    pub fn for_mode(&self, mode: GameMode) -> &[String] {
        match mode {
            GameMode::Friend => &self.friend,
            GameMode::Pink => &self.pink,
        }
    }
}

///
/// Note: Persistence methods (load/store) are provided by tickbomb-core via the
/// `GameConfigExt` trait, as they require filesystem dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Countdown length contributed by each participant
    #[serde(default = "default_seconds_per_player")]
    pub seconds_per_player: u32,
    #[serde(default = "default_min_players")]
    pub min_players: u32,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    #[serde(default = "default_players")]
    pub default_players: u32,
    #[serde(default)]
    pub default_mode: GameMode,
    /// Countdown tick period
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub prompts: PromptOverrides,
}

fn default_seconds_per_player() -> u32 {
    15
}

fn default_min_players() -> u32 {
    2
}

fn default_max_players() -> u32 {
    20
}

fn default_players() -> u32 {
    4
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seconds_per_player: default_seconds_per_player(),
            min_players: default_min_players(),
            max_players: default_max_players(),
            default_players: default_players(),
            default_mode: GameMode::default(),
            tick_ms: default_tick_ms(),
            speech: SpeechSettings::default(),
            audio: AudioSettings::default(),
            prompts: PromptOverrides::default(),
        }
    }
}

impl GameConfig {
    /// Countdown length in whole seconds for a given participant count
    pub fn total_seconds(&self, player_count: u32) -> u32 {
        player_count.saturating_mul(self.seconds_per_player)
    }
}
