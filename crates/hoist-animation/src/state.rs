//! Playback state - which clip is playing, how, and since when

use crate::speed::SpeedMultiplier;
use log::{debug, warn};
use std::time::{Duration, Instant};

/// Mutable playback fields, owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Index of the clip being played
    pub clip: usize,
    /// Wrap at the end of the clip instead of holding the final frame
    pub looping: bool,
    /// Integer playback speed, never zero
    pub speed: SpeedMultiplier,
    /// When playback of the current clip (re)started
    pub started_at: Instant,
}

impl PlaybackState {
    pub fn new(clip: usize, looping: bool, speed: SpeedMultiplier, now: Instant) -> Self {
        Self {
            clip,
            looping,
            speed,
            started_at: now,
        }
    }

    /// Play `clip` from its beginning. Replaying the current clip restarts it too.
    pub fn restart(&mut self, clip: usize, looping: bool, now: Instant) {
        self.clip = clip;
        self.looping = looping;
        self.started_at = now;
    }

    /// Seconds since playback started. A timestamp older than the start
    /// (clock regression) counts as zero.
    pub fn elapsed(&self, now: Instant) -> f64 {
        match now.checked_duration_since(self.started_at) {
            Some(elapsed) => elapsed.as_secs_f64(),
            None => {
                debug!("Frame timestamp precedes playback start, clamping elapsed to 0");
                0.0
            }
        }
    }

    /// Unwrapped clip-time position: elapsed seconds scaled by speed
    pub fn scaled_elapsed(&self, now: Instant) -> f64 {
        self.elapsed(now) * self.speed.as_f64()
    }

    /// Change speed while keeping the current clip-time position, by moving
    /// the start timestamp so that `elapsed * speed` is unchanged at `now`.
    ///
    /// Returns `false` and keeps the old speed when the start cannot be moved.
    pub fn set_speed(&mut self, speed: SpeedMultiplier, now: Instant) -> bool {
        let position = self.scaled_elapsed(now);
        self.set_speed_at_position(speed, now, position)
    }

    fn set_speed_at_position(&mut self, speed: SpeedMultiplier, now: Instant, position: f64) -> bool {
        if speed == self.speed {
            return true;
        }
        let start = Duration::try_from_secs_f64(position / speed.as_f64())
            .ok()
            .and_then(|rebased| now.checked_sub(rebased));
        match start {
            Some(start) => {
                self.started_at = start;
                self.speed = speed;
                true
            }
            None => {
                warn!(
                    "Cannot keep clip position {:.3}s at {}, staying at {}",
                    position, speed, self.speed
                );
                false
            }
        }
    }
}
