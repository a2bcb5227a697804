//! Clocks

use std::cell::Cell;

use jiff::{SignedDuration, Timestamp};

/// Source of booking timestamps.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    /// Creates a clock stopped at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward, saturating at the maximum timestamp.
    pub fn advance(&self, by: SignedDuration) {
        let next = self
            .now
            .get()
            .checked_add(by)
            .unwrap_or(Timestamp::MAX);

        self.now.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
