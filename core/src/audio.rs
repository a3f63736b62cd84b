//! Sound effect backend
//!
//! The engine only decides *when* a sound plays and at what urgency. How it
//! is synthesized belongs to the front-end's [`AudioBackend`].

/// Fire-and-forget sound effects.
///
/// Implementations must swallow their own failures: gameplay timing never
/// depends on sound output.
pub trait AudioBackend {
    /// Called from the first user gesture (platforms that gate audio on it).
    fn unlock(&self) {}

    /// One "lub-dub" at the given urgency (0.0 calm → 1.0 panic)
    fn play_heartbeat(&self, urgency: f64);

    fn play_explosion(&self);

    /// Chime played when a prompt is cleared
    fn play_success(&self);
}

/// Backend that plays nothing (muted or no output device).
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn play_heartbeat(&self, _urgency: f64) {}
    fn play_explosion(&self) {}
    fn play_success(&self) {}
}

/// Synthesis parameters for one heartbeat.
///
/// Both thumps pitch down exponentially and fade out over their decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartbeatTone {
    /// "lub" start frequency in Hz (40 calm → 80 panic)
    pub base_freq: f32,
    /// Peak gain of the first thump (0.15 → 0.6)
    pub volume: f32,
    /// Thump length in seconds (0.15 → 0.08)
    pub decay: f32,
    /// Gap before the "dub" in seconds (0.10 → 0.06)
    pub dub_delay: f32,
}

impl HeartbeatTone {
    pub fn for_urgency(urgency: f64) -> Self {
        let u = urgency.clamp(0.0, 1.0) as f32;
        Self {
            base_freq: 40.0 + u * 40.0,
            volume: 0.15 + u * 0.45,
            decay: 0.15 - u * 0.07,
            dub_delay: 0.1 - u * 0.04,
        }
    }

    /// "dub" start frequency, slightly above the "lub"
    pub fn dub_freq(&self) -> f32 {
        self.base_freq * 1.3
    }

    pub fn dub_volume(&self) -> f32 {
        self.volume * 0.7
    }

    pub fn dub_decay(&self) -> f32 {
        self.decay * 0.8
    }
}

/// Two-note success chime (C5 then E5)
pub const SUCCESS_CHIME_HZ: [f32; 2] = [523.0, 659.0];
