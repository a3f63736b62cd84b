//! Timer scheduling
//!
//! Every delayed action in the engine goes through a [`Scheduler`]:
//! - **Countdown ticks**: one per second while a round is active
//! - **Heartbeats**: repeating at an interval derived from urgency
//! - **Speech segments**: one per punctuation-delimited chunk of a prompt
//!
//! The engine is single-threaded and cooperative. Tasks never run while
//! another task is running, so they only need `Rc`/`RefCell` for sharing.
//!
//! [`VirtualClock`] is the only scheduler implementation. Tests advance it by
//! hand; front-ends wrap it in a [`RealtimeDriver`] that advances it along
//! wall-clock time.

mod realtime;
mod virtual_clock;

use std::time::Duration;

pub use realtime::RealtimeDriver;
pub use virtual_clock::VirtualClock;

/// A deferred action. Runs at most once.
pub type Task = Box<dyn FnOnce()>;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedules one-shot tasks on a shared logical clock.
pub trait Scheduler {
    /// Run `task` once, `delay` after the current logical time.
    ///
    /// Tasks with equal deadlines run in the order they were scheduled.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Drop a pending task. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&self, handle: TaskHandle);
}
