//! Frame drivers - the display-refresh scheduling primitive
//!
//! A driver fires a posted callback once, on the next refresh. Callbacks
//! that want to keep running must post themselves again from inside the
//! tick, which is what `FrameScheduler` does.

use crate::clock::TimeSource;
use log::trace;
use std::time::{Duration, Instant};

/// Identifies one posted frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One display refresh: the callback that fired and the frame timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub token: FrameToken,
    pub now: Instant,
}

/// Registers and cancels one-shot per-refresh callbacks
pub trait FrameDriver {
    /// Post a callback for the next refresh. Replaces any earlier posting.
    fn post_frame_callback(&mut self) -> FrameToken;

    /// Cancel a posted callback. Unknown or already-fired tokens are ignored.
    fn remove_frame_callback(&mut self, token: FrameToken);
}

/// Driver for hosts that own their refresh loop (a window's redraw event,
/// a test harness). The host calls [`HostDriver::fire`] once per refresh.
#[derive(Debug, Default)]
pub struct HostDriver {
    next_id: u64,
    pending: Option<FrameToken>,
}

impl HostDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The callback that will fire on the next refresh, if any
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Fire the pending callback for a refresh at `now`
    pub fn fire(&mut self, now: Instant) -> Option<FrameTick> {
        self.pending.take().map(|token| FrameTick { token, now })
    }
}

impl FrameDriver for HostDriver {
    fn post_frame_callback(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending = Some(token);
        token
    }

    fn remove_frame_callback(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

/// Fixed-rate driver that paces frames against a time source.
/// Stands in for vsync when there is no display.
pub struct RefreshDriver<T: TimeSource> {
    clock: T,
    interval: Duration,
    next_deadline: Option<Instant>,
    host: HostDriver,
}

impl<T: TimeSource> RefreshDriver<T> {
    /// Create a driver refreshing `hz` times per second (clamped to at least 1)
    pub fn new(clock: T, hz: u32) -> Self {
        Self {
            clock,
            interval: Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1))),
            next_deadline: None,
            host: HostDriver::new(),
        }
    }

    /// Time between refreshes
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The time source frames are stamped with
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Wait for the next refresh and fire the pending callback.
    ///
    /// Returns `None` without waiting when nothing is posted, which is how
    /// a loop driven by this function ends after the scheduler stops.
    pub fn next_frame(&mut self) -> Option<FrameTick> {
        self.host.pending()?;

        let now = self.clock.now();
        let deadline = self.next_deadline.unwrap_or(now);
        if let Some(wait) = deadline.checked_duration_since(now) {
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        }

        let now = self.clock.now();
        let mut next = deadline + self.interval;
        if next <= now {
            // Fell behind: skip the missed refreshes instead of bursting
            trace!("Refresh driver dropped frames");
            next = now + self.interval;
        }
        self.next_deadline = Some(next);

        self.host.fire(now)
    }
}

impl<T: TimeSource> FrameDriver for RefreshDriver<T> {
    fn post_frame_callback(&mut self) -> FrameToken {
        self.host.post_frame_callback()
    }

    fn remove_frame_callback(&mut self, token: FrameToken) {
        self.host.remove_frame_callback(token);
    }
}
