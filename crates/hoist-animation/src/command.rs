//! Command handoff from UI threads to the frame loop
//!
//! UI actions never touch `PlaybackState` directly. They are queued on a
//! bounded channel and applied by the controller at the start of its next
//! frame, on the frame loop's own thread.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use hoist_core::{HoistError, Result};

/// Capacity of the UI → frame loop queue
pub const COMMAND_CAPACITY: usize = 64;

/// A playback action requested by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    SelectClip { index: usize, looping: bool },
    IncreaseSpeed,
    DecreaseSpeed,
}

/// Producer side of the command queue. There is one live handle per
/// controller; it can move to another thread but is not cloneable.
#[derive(Debug)]
pub struct ControlHandle {
    tx: Sender<PlaybackCommand>,
}

impl ControlHandle {
    pub(crate) fn channel() -> (ControlHandle, Receiver<PlaybackCommand>) {
        let (tx, rx) = crossbeam_channel::bounded(COMMAND_CAPACITY);
        (ControlHandle { tx }, rx)
    }

    pub fn select_clip(&self, index: usize, looping: bool) -> Result<()> {
        self.send(PlaybackCommand::SelectClip { index, looping })
    }

    pub fn increase_speed(&self) -> Result<()> {
        self.send(PlaybackCommand::IncreaseSpeed)
    }

    pub fn decrease_speed(&self) -> Result<()> {
        self.send(PlaybackCommand::DecreaseSpeed)
    }

    pub fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => {
                HoistError::RuntimeError("Playback command queue is full".into())
            }
            TrySendError::Disconnected(_) => {
                HoistError::RuntimeError("Playback controller is gone".into())
            }
        })
    }
}
