//! Animation playback for the Hoist pose viewer
//!
//! Turns frame timestamps into clip positions and drives an engine-owned
//! model through them:
//! - `ClipCatalog` - clip names and durations read from the loaded model
//! - `PlaybackState` / `SpeedMultiplier` - what plays, how fast, since when
//! - `PlaybackClock` - loop and one-shot mapping of elapsed time into a clip
//! - `PlaybackController` - selection, speed changes and the per-frame
//!   clock → pose → render sequence, run by the `FrameScheduler`

pub mod capability;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod controller;
pub mod notifier;
pub mod poses;
pub mod speed;
pub mod state;

pub use capability::{AnimatedModel, AssetLoader};
pub use catalog::{Clip, ClipCatalog};
pub use clock::{in_clip_time, ClockReading, PlaybackClock};
pub use command::{ControlHandle, PlaybackCommand};
pub use controller::{PlaybackController, PlaybackDefaults};
pub use notifier::{LogNotifier, NoticeQueue, PlaybackNotice, PlaybackNotifier};
pub use poses::PoseMap;
pub use speed::SpeedMultiplier;
pub use state::PlaybackState;
