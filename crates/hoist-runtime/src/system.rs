//! Runtime system trait

use hoist_core::Result;
use std::time::Instant;

/// A system that is ticked once per display refresh by the `FrameScheduler`
///
/// `now` is the frame timestamp handed out by the frame driver. Systems must
/// use it for every time computation in the frame instead of reading a clock
/// themselves, so that one frame sees one instant.
pub trait RuntimeSystem {
    /// Called once per frame while the scheduler is running
    fn update(&mut self, now: Instant) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
