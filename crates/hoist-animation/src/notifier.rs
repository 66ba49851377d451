//! Playback notices reported to the UI layer on clip selection

use crate::catalog::Clip;
use log::info;
use serde::Serialize;
use std::fmt;

/// What started playing. Emitted once per clip selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackNotice {
    pub clip_index: usize,
    pub clip_name: String,
    /// Seconds, at the precision the engine reported
    pub duration: f32,
    pub is_degenerate: bool,
}

impl PlaybackNotice {
    /// Notice describing `clip`
    pub fn for_clip(clip: &Clip) -> Self {
        Self {
            clip_index: clip.index,
            clip_name: clip.name.clone(),
            duration: clip.reported_duration(),
            is_degenerate: clip.is_degenerate(),
        }
    }
}

impl fmt::Display for PlaybackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_degenerate {
            write!(f, "Animation '{}' has zero duration.", self.clip_name)
        } else {
            write!(f, "Playing '{}' ({} seconds)", self.clip_name, self.duration)
        }
    }
}

/// Receives playback notices. Fire-and-forget: implementations must not block.
pub trait PlaybackNotifier {
    fn notify(&mut self, notice: PlaybackNotice);
}

impl<F: FnMut(PlaybackNotice)> PlaybackNotifier for F {
    fn notify(&mut self, notice: PlaybackNotice) {
        self(notice)
    }
}

/// Writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl PlaybackNotifier for LogNotifier {
    fn notify(&mut self, notice: PlaybackNotice) {
        info!("{}", notice);
    }
}

/// Holds notices until the UI drains them
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Vec<PlaybackNotice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice
    pub fn drain(&mut self) -> Vec<PlaybackNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

impl PlaybackNotifier for NoticeQueue {
    fn notify(&mut self, notice: PlaybackNotice) {
        self.notices.push(notice);
    }
}
