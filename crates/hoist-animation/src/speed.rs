//! Speed multiplier and the doubling/halving policy
//!
//! The multiplier is an integer that is never zero. Halving truncates but
//! stops at 1; a multiplier of 0 would freeze the pose while the clip still
//! claims to be playing.

use std::fmt;
use std::num::NonZeroU32;

/// Integer scale applied to elapsed time before it is mapped into a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedMultiplier(NonZeroU32);

impl SpeedMultiplier {
    pub const NORMAL: SpeedMultiplier = SpeedMultiplier(NonZeroU32::MIN);

    /// `None` for 0
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// The raw multiplier, at least 1
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The multiplier as a scale factor for elapsed seconds
    pub fn as_f64(self) -> f64 {
        f64::from(self.0.get())
    }

    /// Double the multiplier. `None` if that would overflow.
    pub fn doubled(self) -> Option<Self> {
        self.0.get().checked_mul(2).and_then(Self::new)
    }

    /// Halve the multiplier with truncating division, never below 1
    pub fn halved(self) -> Self {
        NonZeroU32::new(self.0.get() / 2).map_or(Self::NORMAL, Self)
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}
