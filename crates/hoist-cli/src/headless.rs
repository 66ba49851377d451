//! Headless engine - stands in for the renderer when running from a terminal
//!
//! Poses are recorded instead of skinned and frames are counted instead of
//! drawn, which is enough to watch the playback controller work.

use hoist_animation::{AnimatedModel, AssetLoader};
use hoist_core::{HoistError, Result};
use hoist_import::{ImportedEnvironment, ImportedModel};
use log::trace;
use std::path::Path;
use std::time::Instant;

/// A model loaded without a GPU
pub struct HeadlessModel {
    model: ImportedModel,
    environment: Option<ImportedEnvironment>,
    pose: Option<(usize, f32)>,
    bones_dirty: bool,
    frames: u64,
}

impl HeadlessModel {
    pub fn new(model: ImportedModel) -> Self {
        Self {
            model,
            environment: None,
            pose: None,
            bones_dirty: false,
            frames: 0,
        }
    }

    pub fn info(&self) -> &ImportedModel {
        &self.model
    }

    pub fn set_environment(&mut self, environment: ImportedEnvironment) {
        self.environment = Some(environment);
    }

    pub fn environment(&self) -> Option<&ImportedEnvironment> {
        self.environment.as_ref()
    }

    /// Last applied clip and in-clip time
    pub fn current_pose(&self) -> Option<(usize, f32)> {
        self.pose
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.model.clips.len() {
            Ok(())
        } else {
            Err(HoistError::InvalidClipIndex {
                index,
                count: self.model.clips.len(),
            })
        }
    }
}

impl AnimatedModel for HeadlessModel {
    fn clip_count(&self) -> usize {
        self.model.clips.len()
    }

    fn clip_duration(&self, index: usize) -> Result<f32> {
        self.check_index(index)?;
        Ok(self.model.clips[index].duration)
    }

    fn clip_name(&self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(self.model.clips[index].name.clone())
    }

    fn apply_pose(&mut self, index: usize, in_clip_time: f32) -> Result<()> {
        self.check_index(index)?;
        self.pose = Some((index, in_clip_time));
        self.bones_dirty = true;
        Ok(())
    }

    fn update_bone_matrices(&mut self) {
        self.bones_dirty = false;
    }

    fn render(&mut self, _timestamp: Instant) -> Result<()> {
        if self.bones_dirty {
            return Err(HoistError::RenderError(
                "Rendering with stale bone matrices".into(),
            ));
        }
        self.frames += 1;
        trace!("Frame {} pose {:?}", self.frames, self.pose);
        Ok(())
    }
}

/// Loads models and environments for the headless engine
pub struct HeadlessLoader {
    ibl_intensity: f32,
}

impl HeadlessLoader {
    pub fn new(ibl_intensity: f32) -> Self {
        Self { ibl_intensity }
    }
}

impl AssetLoader for HeadlessLoader {
    type Model = HeadlessModel;
    type Environment = ImportedEnvironment;

    fn load_model(&mut self, path: &Path) -> Result<HeadlessModel> {
        hoist_import::import_clips(path).map(HeadlessModel::new)
    }

    fn load_environment(&mut self, path: &Path) -> Result<ImportedEnvironment> {
        hoist_import::load_environment_dir(path).map(|env| env.with_intensity(self.ibl_intensity))
    }
}
