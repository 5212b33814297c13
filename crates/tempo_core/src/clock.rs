//! Time sources
//!
//! All timestamps are milliseconds as `f64`, measured from an arbitrary origin.

use std::cell::Cell;
use std::time::Instant;

/// A source of monotonic timestamps in milliseconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`], with its origin at construction
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to
///
/// Used to drive frame loops deterministically in tests and offline rendering.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `ms`
    pub fn starting_at(ms: f64) -> Self {
        Self { now: Cell::new(ms) }
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Move the clock forward by `ms`
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
