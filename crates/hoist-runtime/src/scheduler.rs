//! Frame scheduler - the per-frame driver state machine
//!
//! `Stopped → Running → Stopped`. While running, each tick first re-posts
//! itself with the frame driver and then updates the system, so the loop
//! keeps going until `stop()` cancels the pending callback.

use crate::driver::{FrameDriver, FrameTick, FrameToken};
use crate::system::RuntimeSystem;
use hoist_core::Result;
use log::{debug, trace};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Dispatches frame ticks from a `FrameDriver` to a `RuntimeSystem`
pub struct FrameScheduler<D: FrameDriver> {
    driver: D,
    state: SchedulerState,
    /// Callback currently posted with the driver
    pending: Option<FrameToken>,
    frames: u64,
}

impl<D: FrameDriver> FrameScheduler<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: SchedulerState::Stopped,
            pending: None,
            frames: 0,
        }
    }

    /// Begin ticking. No-op if already running.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Running {
            return;
        }
        self.pending = Some(self.driver.post_frame_callback());
        self.state = SchedulerState::Running;
        debug!("Frame scheduler started");
    }

    /// Stop ticking and cancel the posted callback. No-op if already stopped.
    ///
    /// Any tick delivered after this returns is ignored by `on_frame`.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        if let Some(token) = self.pending.take() {
            self.driver.remove_frame_callback(token);
        }
        self.state = SchedulerState::Stopped;
        debug!("Frame scheduler stopped after {} frames", self.frames);
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Number of ticks dispatched so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Handle one fired frame callback.
    ///
    /// Returns `Ok(false)` when the tick was ignored: the scheduler is
    /// stopped, or the token is not the callback it currently has posted.
    /// Otherwise the next frame is posted before the system runs, and the
    /// system's result is returned; an error does not stop the loop.
    pub fn on_frame<S>(&mut self, tick: FrameTick, system: &mut S) -> Result<bool>
    where
        S: RuntimeSystem + ?Sized,
    {
        if self.state != SchedulerState::Running || self.pending != Some(tick.token) {
            trace!("Ignoring stale frame tick {}", tick.token.id());
            return Ok(false);
        }

        self.pending = Some(self.driver.post_frame_callback());
        self.frames += 1;

        system.update(tick.now)?;
        Ok(true)
    }
}

impl<D: FrameDriver> Drop for FrameScheduler<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
