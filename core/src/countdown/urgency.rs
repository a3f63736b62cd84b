//! Urgency curve and the cues derived from it

use std::time::Duration;

use tickbomb_types::PresentationPhase;

/// Heartbeat period at urgency 0
pub const CALM_INTERVAL_MS: f64 = 1200.0;
/// Heartbeat period floor, reached at urgency 1
pub const PANIC_INTERVAL_MS: f64 = 180.0;

const CURVE_EXPONENT: f64 = 1.5;
const CURVE_GAIN: f64 = 1.2;

/// Time-pressure intensity in [0, 1].
///
/// Slow ramp for roughly the first 60% of the round, then a sharp rise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Urgency(f64);

impl Urgency {
    pub const CALM: Urgency = Urgency(0.0);
    pub const MAX: Urgency = Urgency(1.0);

    /// `min(1, (elapsed / total)^1.5 * 1.2)`; a zero total counts as expired.
    pub fn at(elapsed: u32, total: u32) -> Self {
        if total == 0 {
            return Self::MAX;
        }
        let progress = (elapsed as f64 / total as f64).clamp(0.0, 1.0);
        Self((progress.powf(CURVE_EXPONENT) * CURVE_GAIN).min(1.0))
    }

    /// Wrap a raw value, clamping into [0, 1]. NaN counts as calm.
    pub fn from_value(value: f64) -> Self {
        if value.is_nan() {
            return Self::CALM;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `max(180, 1200 - urgency * 1020)` milliseconds
    pub fn heartbeat_interval_ms(self) -> f64 {
        (CALM_INTERVAL_MS - self.0 * (CALM_INTERVAL_MS - PANIC_INTERVAL_MS)).max(PANIC_INTERVAL_MS)
    }

    pub fn heartbeat_interval(self) -> Duration {
        Duration::from_micros((self.heartbeat_interval_ms() * 1000.0).round() as u64)
    }

    pub fn phase(self) -> PresentationPhase {
        PresentationPhase::for_urgency(self.0)
    }
}
