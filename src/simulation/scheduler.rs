//! Single pending timer with an injectable time source.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Timer {
    /// Time elapsed since the timer's origin
    fn now(&self) -> Duration;
}

/// Wall clock, measured from construction
#[derive(Clone, Copy, Debug)]
pub struct WallTimer {
    origin: Instant,
}

impl WallTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for WallTimer {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced time source for deterministic tests
///
/// Clones share the same time, so a test can keep a handle while the
/// scheduler owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    now: Rc<Cell<Duration>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Fire-and-forget delayed callback, reduced to one pending deadline
///
/// The owner polls [`take_due`](Scheduler::take_due); cancelling clears the
/// deadline so an armed-but-unfired tick never runs.
#[derive(Debug)]
pub struct Scheduler<T: Timer> {
    timer: T,
    pending: Option<Duration>,
}

impl<T: Timer> Scheduler<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            pending: None,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Arm the timer `delay` from now, replacing any pending deadline
    pub fn schedule(&mut self, delay: Duration) {
        self.pending = Some(self.timer.now() + delay);
    }

    /// Disarm; returns whether a deadline was pending
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending deadline if it has passed
    pub fn take_due(&mut self) -> bool {
        match self.pending {
            Some(deadline) if self.timer.now() >= deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Remaining wait until the pending deadline (zero if overdue)
    pub fn time_until_due(&self) -> Option<Duration> {
        self.pending
            .map(|deadline| deadline.saturating_sub(self.timer.now()))
    }
}
