//! Hoist Runtime - Frame loop infrastructure
//!
//! Provides the building blocks for a display-refresh-driven loop:
//! - `TimeSource` - monotonic timestamps (`MonotonicClock`, `ManualClock`)
//! - `FrameDriver` - the "fire once per refresh until cancelled" primitive
//! - `FrameScheduler` - start/stop state machine that dispatches frame ticks
//! - `RuntimeSystem` - trait for work performed once per frame

mod clock;
mod driver;
mod scheduler;
mod system;

pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use driver::{FrameDriver, FrameTick, FrameToken, HostDriver, RefreshDriver};
pub use scheduler::{FrameScheduler, SchedulerState};
pub use system::RuntimeSystem;
