//! Engine capabilities consumed by the playback controller
//!
//! The rendering engine owns decoding, skinning and GPU submission. The
//! controller only sees these traits, and only after an asset load has
//! produced a model.

use hoist_core::Result;
use std::path::Path;
use std::time::Instant;

/// A loaded, rigged model that can evaluate clips and render itself
pub trait AnimatedModel {
    /// Number of animation clips in the model
    fn clip_count(&self) -> usize;

    /// Duration of a clip in seconds
    fn clip_duration(&self, index: usize) -> Result<f32>;

    /// Name of a clip
    fn clip_name(&self, index: usize) -> Result<String>;

    /// Pose the skeleton at `in_clip_time` seconds into a clip.
    /// Fails with `InvalidClipIndex` when `index` is out of range.
    fn apply_pose(&mut self, index: usize, in_clip_time: f32) -> Result<()>;

    /// Push the posed joints into the skinning matrices
    fn update_bone_matrices(&mut self) {}

    /// Submit the current frame
    fn render(&mut self, timestamp: Instant) -> Result<()>;
}

/// Asset loaders backing a model instance. Loading may be slow; the
/// controller is only attached once `load_model` has returned.
pub trait AssetLoader {
    type Model: AnimatedModel;
    type Environment;

    fn load_model(&mut self, path: &Path) -> Result<Self::Model>;

    fn load_environment(&mut self, path: &Path) -> Result<Self::Environment>;
}
