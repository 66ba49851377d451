//! Monotonic time sources

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of frame and selection timestamps.
///
/// Implementations must be monotonic. Calendar time is never used for
/// playback since wall-clock adjustments would make clips jump.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// The process monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Used for deterministic frame loops.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Start a manual clock pinned at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(base: Instant) -> Self {
        Self {
            base,
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move the clock forward by fractional seconds. Negative values are ignored.
    pub fn advance_secs(&self, secs: f64) {
        if secs > 0.0 {
            self.advance(Duration::from_secs_f64(secs));
        }
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::rc::Rc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
