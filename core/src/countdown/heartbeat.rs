//! Repeating heartbeat whose cadence follows urgency

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::audio::AudioBackend;
use crate::scheduler::{Scheduler, TaskHandle};

use super::Urgency;

/// Cadence currently armed for the heartbeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartbeatSchedule {
    pub urgency: Urgency,
    pub interval: Duration,
}

impl HeartbeatSchedule {
    pub fn for_urgency(urgency: Urgency) -> Self {
        Self {
            urgency,
            interval: urgency.heartbeat_interval(),
        }
    }
}

/// Owns the single pending heartbeat timer of a round.
///
/// Dropping a `Heartbeat` silences it.
pub struct Heartbeat {
    scheduler: Rc<dyn Scheduler>,
    audio: Rc<dyn AudioBackend>,
    /// Shared with the armed task so it can re-arm itself
    pending: Rc<Cell<Option<TaskHandle>>>,
    current: Option<HeartbeatSchedule>,
}

impl Heartbeat {
    pub fn new(scheduler: Rc<dyn Scheduler>, audio: Rc<dyn AudioBackend>) -> Self {
        Self {
            scheduler,
            audio,
            pending: Rc::new(Cell::new(None)),
            current: None,
        }
    }

    /// Play one beat now and repeat it at the interval for `urgency`,
    /// replacing whatever cadence was armed before.
    pub fn retune(&mut self, urgency: Urgency) -> HeartbeatSchedule {
        self.silence();
        self.audio.play_heartbeat(urgency.value());

        let schedule = HeartbeatSchedule::for_urgency(urgency);
        arm(
            Rc::clone(&self.scheduler),
            Rc::clone(&self.audio),
            Rc::clone(&self.pending),
            schedule,
        );
        self.current = Some(schedule);
        schedule
    }

    /// Cancel the pending beat, if any.
    pub fn silence(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.current = None;
    }

    pub fn schedule(&self) -> Option<HeartbeatSchedule> {
        self.current
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.silence();
    }
}

fn arm(
    scheduler: Rc<dyn Scheduler>,
    audio: Rc<dyn AudioBackend>,
    pending: Rc<Cell<Option<TaskHandle>>>,
    schedule: HeartbeatSchedule,
) {
    let task_scheduler = Rc::clone(&scheduler);
    let task_pending = Rc::clone(&pending);
    let handle = scheduler.schedule(
        schedule.interval,
        Box::new(move || {
            audio.play_heartbeat(schedule.urgency.value());
            arm(task_scheduler, audio, task_pending, schedule);
        }),
    );
    pending.set(Some(handle));
}
