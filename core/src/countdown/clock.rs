//! Countdown state and the per-tick urgency update

use std::rc::Rc;

use tickbomb_types::PresentationPhase;
use tracing::debug;

use crate::audio::AudioBackend;
use crate::error::GameError;
use crate::scheduler::Scheduler;

use super::{Heartbeat, HeartbeatSchedule, Urgency};

/// Whole-second countdown. `elapsed` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    total: u32,
    elapsed: u32,
}

impl CountdownState {
    pub fn new(total_secs: u32) -> Result<Self, GameError> {
        if total_secs == 0 {
            return Err(GameError::InvalidDuration { total_secs });
        }
        Ok(Self {
            total: total_secs,
            elapsed: 0,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn remaining(&self) -> u32 {
        self.total - self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    pub fn urgency(&self) -> Urgency {
        Urgency::at(self.elapsed, self.total)
    }

    /// Count one second. Returns true once the countdown has run out.
    fn advance(&mut self) -> bool {
        if self.elapsed < self.total {
            self.elapsed += 1;
        }
        self.is_finished()
    }
}

/// Snapshot of the cues recomputed on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub elapsed: u32,
    pub remaining: u32,
    pub urgency: Urgency,
    pub phase: PresentationPhase,
    pub heartbeat: HeartbeatSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Countdown still running; cues recomputed
    Ticked(TickReport),
    /// Countdown just ran out. Reported exactly once.
    Expired,
    /// Countdown had already run out; nothing happened
    Idle,
}

/// Countdown plus the heartbeat it drives.
pub struct UrgencyClock {
    countdown: CountdownState,
    heartbeat: Heartbeat,
    expired: bool,
}

impl UrgencyClock {
    pub fn new(
        total_secs: u32,
        scheduler: Rc<dyn Scheduler>,
        audio: Rc<dyn AudioBackend>,
    ) -> Result<Self, GameError> {
        Ok(Self {
            countdown: CountdownState::new(total_secs)?,
            heartbeat: Heartbeat::new(scheduler, audio),
            expired: false,
        })
    }

    /// Render the first heartbeat at elapsed 0.
    pub fn start(&mut self) -> TickReport {
        self.report()
    }

    /// Count one second and recompute urgency, phase and heartbeat cadence.
    pub fn tick(&mut self) -> TickOutcome {
        if self.expired {
            return TickOutcome::Idle;
        }

        if self.countdown.advance() {
            self.expired = true;
            self.heartbeat.silence();
            debug!(total = self.countdown.total(), "countdown expired");
            return TickOutcome::Expired;
        }

        TickOutcome::Ticked(self.report())
    }

    /// Stop the heartbeat without touching the countdown.
    pub fn halt(&mut self) {
        self.heartbeat.silence();
    }

    pub fn countdown(&self) -> CountdownState {
        self.countdown
    }

    pub fn urgency(&self) -> Urgency {
        self.countdown.urgency()
    }

    pub fn phase(&self) -> PresentationPhase {
        self.urgency().phase()
    }

    pub fn heartbeat(&self) -> Option<HeartbeatSchedule> {
        self.heartbeat.schedule()
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    fn report(&mut self) -> TickReport {
        let urgency = self.countdown.urgency();
        let heartbeat = self.heartbeat.retune(urgency);
        TickReport {
            elapsed: self.countdown.elapsed(),
            remaining: self.countdown.remaining(),
            urgency,
            phase: urgency.phase(),
            heartbeat,
        }
    }
}
