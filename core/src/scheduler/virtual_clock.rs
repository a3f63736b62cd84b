//! Deterministic logical clock
//!
//! Holds pending tasks ordered by (deadline, scheduling order) and fires them
//! when advanced. Logical time only moves when [`VirtualClock::advance`] or
//! [`VirtualClock::advance_to`] is called.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::{Scheduler, Task, TaskHandle};

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    /// Pending tasks keyed by (deadline, id) so equal deadlines keep FIFO order
    queue: BTreeMap<(Duration, u64), Task>,
    /// id -> deadline, for cancellation
    deadlines: HashMap<u64, Duration>,
}

/// Single-threaded scheduler over logical time.
#[derive(Default)]
pub struct VirtualClock {
    state: RefCell<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time since the clock was created
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of tasks waiting to fire
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .borrow()
            .queue
            .first_key_value()
            .map(|(&(deadline, _), _)| deadline)
    }

    /// Move logical time forward by `by`, firing every task that falls due.
    ///
    /// Returns the number of tasks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        self.advance_to(target)
    }

    /// Move logical time forward to `target`, firing every task due at or
    /// before it (including tasks scheduled by tasks fired along the way).
    /// Time never moves backwards.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some(task) = self.pop_due(target) {
            // The state borrow is released here, so the task may schedule
            // or cancel freely.
            task();
            fired += 1;
        }

        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut state = self.state.borrow_mut();
        let (&(deadline, id), _) = state.queue.first_key_value()?;
        if deadline > target {
            return None;
        }
        state.deadlines.remove(&id);
        if deadline > state.now {
            state.now = deadline;
        }
        state.queue.remove(&(deadline, id))
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now.saturating_add(delay);
        state.deadlines.insert(id, deadline);
        state.queue.insert((deadline, id), task);
        TaskHandle::new(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let removed = {
            let mut state = self.state.borrow_mut();
            match state.deadlines.remove(&handle.id()) {
                Some(deadline) => state.queue.remove(&(deadline, handle.id())),
                None => None,
            }
        };
        // Dropped outside the borrow: captured state may hold other handles.
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move |name: &'static str| -> Task {
                let log = Rc::clone(&log);
                Box::new(move || log.borrow_mut().push(name))
            }
        };
        (log, make)
    }

    #[test]
    fn fires_in_deadline_then_fifo_order() {
        let clock = VirtualClock::new();
        let (log, task) = recorder();

        clock.schedule(Duration::from_millis(200), task("late"));
        clock.schedule(Duration::from_millis(100), task("first"));
        clock.schedule(Duration::from_millis(100), task("second"));

        assert_eq!(clock.advance(Duration::from_millis(99)), 0);
        assert_eq!(clock.advance(Duration::from_millis(1)), 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);

        clock.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn cancelled_task_never_fires() {
        let clock = VirtualClock::new();
        let (log, task) = recorder();

        let handle = clock.schedule(Duration::from_millis(10), task("cancelled"));
        clock.schedule(Duration::from_millis(20), task("kept"));
        clock.cancel(handle);
        // Second cancel is harmless
        clock.cancel(handle);

        clock.advance(Duration::from_secs(1));
        assert_eq!(*log.borrow(), vec!["kept"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn tasks_scheduled_while_firing_run_within_same_advance() {
        let clock = Rc::new(VirtualClock::new());
        let count = Rc::new(RefCell::new(0));

        let inner_clock = Rc::clone(&clock);
        let inner_count = Rc::clone(&count);
        clock.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                *inner_count.borrow_mut() += 1;
                let nested_count = Rc::clone(&inner_count);
                inner_clock.schedule(
                    Duration::from_millis(10),
                    Box::new(move || *nested_count.borrow_mut() += 1),
                );
            }),
        );

        assert_eq!(clock.advance(Duration::from_millis(20)), 2);
        assert_eq!(*count.borrow(), 2);
    }
}
