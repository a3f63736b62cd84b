//! Synthesized sound sources
//!
//! Everything is generated sample by sample; no sound files are bundled.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rodio::Source;
use tickbomb_core::{HeartbeatTone, SUCCESS_CHIME_HZ};

pub const SAMPLE_RATE: u32 = 44_100;

/// Gain that counts as silence at the end of an exponential fade
const FADE_FLOOR: f32 = 0.001;

fn samples_for(secs: f32) -> u64 {
    (secs.max(0.0) * SAMPLE_RATE as f32).round() as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// Sweep
// ─────────────────────────────────────────────────────────────────────────────

/// Sine whose frequency and gain both move exponentially from a start to an
/// end value, after an optional stretch of silence.
#[derive(Debug, Clone)]
pub struct Sweep {
    silence: u64,
    len: u64,
    index: u64,
    phase: f32,
    freq: (f32, f32),
    gain: (f32, f32),
}

impl Sweep {
    pub fn new(freq: (f32, f32), gain: (f32, f32), secs: f32) -> Self {
        Self {
            silence: 0,
            len: samples_for(secs).max(1),
            index: 0,
            phase: 0.0,
            freq,
            gain,
        }
    }

    pub fn after(mut self, secs: f32) -> Self {
        self.silence = samples_for(secs);
        self
    }

    fn ramp((from, to): (f32, f32), t: f32) -> f32 {
        from * (to / from).powf(t)
    }
}

impl Iterator for Sweep {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.silence + self.len {
            return None;
        }
        let index = self.index;
        self.index += 1;
        if index < self.silence {
            return Some(0.0);
        }

        let t = (index - self.silence) as f32 / self.len as f32;
        let freq = Self::ramp(self.freq, t);
        let gain = Self::ramp(self.gain, t);
        let sample = self.phase.sin() * gain;
        self.phase = (self.phase + TAU * freq / SAMPLE_RATE as f32) % TAU;
        Some(sample)
    }
}

impl Source for Sweep {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            (self.silence + self.len) as f64 / SAMPLE_RATE as f64,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rumble
// ─────────────────────────────────────────────────────────────────────────────

/// Low-passed noise burst that decays away, the body of the explosion.
pub struct Rumble {
    len: u64,
    index: u64,
    /// One-pole low-pass coefficient
    alpha: f32,
    last: f32,
    rng: StdRng,
}

impl Rumble {
    pub fn new(secs: f32, cutoff_hz: f32) -> Self {
        let dt = 1.0 / SAMPLE_RATE as f32;
        let rc = 1.0 / (TAU * cutoff_hz);
        Self {
            len: samples_for(secs).max(1),
            index: 0,
            alpha: dt / (rc + dt),
            last: 0.0,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Iterator for Rumble {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.len {
            return None;
        }
        let i = self.index as f32;
        let len = self.len as f32;
        self.index += 1;

        let noise = self.rng.gen_range(-1.0f32..1.0) * (-i / (len * 0.15)).exp();
        self.last += self.alpha * (noise - self.last);
        let envelope = FADE_FLOOR.powf(i / len);
        Some(self.last * envelope)
    }
}

impl Source for Rumble {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(self.len as f64 / SAMPLE_RATE as f64))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sound effects
// ─────────────────────────────────────────────────────────────────────────────

/// "lub" and "dub" thumps for one heartbeat.
pub fn heartbeat(urgency: f64) -> (Sweep, Sweep) {
    let tone = HeartbeatTone::for_urgency(urgency);
    let lub = Sweep::new(
        (tone.base_freq, tone.base_freq * 0.5),
        (tone.volume, FADE_FLOOR),
        tone.decay,
    );
    let dub = Sweep::new(
        (tone.dub_freq(), tone.base_freq * 0.6),
        (tone.dub_volume(), FADE_FLOOR),
        tone.dub_decay(),
    )
    .after(tone.dub_delay);
    (lub, dub)
}

/// Noise rumble plus a sub-bass drop.
pub fn explosion() -> (Rumble, Sweep) {
    (
        Rumble::new(0.8, 400.0),
        Sweep::new((80.0, 20.0), (0.8, FADE_FLOOR), 0.5),
    )
}

/// Two chime notes, one fade across both.
pub fn success() -> [Sweep; 2] {
    let [low, high] = SUCCESS_CHIME_HZ;
    let midpoint = Sweep::ramp((0.3, FADE_FLOOR), 0.5);
    [
        Sweep::new((low, low), (0.3, midpoint), 0.1),
        Sweep::new((high, high), (midpoint, FADE_FLOOR), 0.1),
    ]
}
