//! Playback clock - maps a frame timestamp to a position inside a clip

use crate::catalog::Clip;
use crate::speed::SpeedMultiplier;
use crate::state::PlaybackState;
use std::time::Instant;

/// Result of reading the clock for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    /// Seconds since playback started, never negative
    pub elapsed: f64,
    /// Position inside the clip in seconds, within `[0, duration]`
    pub in_clip_time: f64,
    /// The clip has zero duration and is held at its only frame
    pub degenerate: bool,
    /// A one-shot clip has reached its final frame and is held there
    pub pinned: bool,
}

/// Position inside a clip after `elapsed` seconds of playback.
///
/// Loops wrap modulo `duration`; one-shot playback clamps to `duration` and
/// stays there. Zero-duration clips always yield 0. Negative or NaN elapsed
/// counts as 0.
pub fn in_clip_time(elapsed: f64, speed: SpeedMultiplier, looping: bool, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    let elapsed = if elapsed > 0.0 { elapsed } else { 0.0 };
    let scaled = elapsed * speed.as_f64();
    if looping {
        scaled % duration
    } else {
        scaled.min(duration)
    }
}

/// Stateless clock over a `PlaybackState`
pub struct PlaybackClock;

impl PlaybackClock {
    pub fn read(state: &PlaybackState, clip: &Clip, now: Instant) -> ClockReading {
        let elapsed = state.elapsed(now);
        if clip.is_degenerate() {
            return ClockReading {
                elapsed,
                in_clip_time: 0.0,
                degenerate: true,
                pinned: false,
            };
        }

        let in_clip_time = in_clip_time(elapsed, state.speed, state.looping, clip.duration);
        ClockReading {
            elapsed,
            in_clip_time,
            degenerate: false,
            pinned: !state.looping && elapsed * state.speed.as_f64() >= clip.duration,
        }
    }
}
