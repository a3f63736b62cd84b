//! Drives a [`VirtualClock`] along wall-clock time.
//!
//! Front-ends run this on a current-thread tokio runtime:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = driver.wait_for_due() => {}
//!         line = input.next_line() => handle(line),
//!     }
//!     driver.catch_up();
//! }
//! ```

use std::rc::Rc;

use tokio::time::{Instant, sleep_until};

use super::VirtualClock;

pub struct RealtimeDriver {
    clock: Rc<VirtualClock>,
    /// Wall-clock instant corresponding to logical time zero
    origin: Instant,
}

impl RealtimeDriver {
    pub fn new(clock: Rc<VirtualClock>) -> Self {
        let origin = Instant::now()
            .checked_sub(clock.now())
            .unwrap_or_else(Instant::now);
        Self { clock, origin }
    }

    /// Fire every task whose deadline has passed in wall-clock time.
    pub fn catch_up(&self) -> usize {
        self.clock.advance_to(self.origin.elapsed())
    }

    /// Sleep until the earliest pending task is due. Never resolves while
    /// nothing is scheduled.
    pub async fn wait_for_due(&self) {
        match self.clock.next_deadline() {
            Some(deadline) => sleep_until(self.origin + deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use std::cell::Cell;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn fires_tasks_once_wall_time_reaches_deadline() {
        let clock = Rc::new(VirtualClock::new());
        let driver = RealtimeDriver::new(Rc::clone(&clock));
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        clock.schedule(Duration::from_millis(1500), Box::new(move || flag.set(true)));

        assert_eq!(driver.catch_up(), 0);
        driver.wait_for_due().await;
        assert_eq!(driver.catch_up(), 1);
        assert!(fired.get());
        assert!(clock.now() >= Duration::from_millis(1500));
    }
}
