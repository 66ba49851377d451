//! Imported asset types

use serde::Serialize;

/// Animation clip metadata read from a model file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedClip {
    pub index: usize,
    pub name: String,
    /// Last keyframe time across all channels, 0 for a clip without keys
    pub duration: f32,
    pub channel_count: usize,
}

/// What the viewer knows about a loaded model file
#[derive(Debug, Clone, Serialize)]
pub struct ImportedModel {
    pub name: String,
    pub source_path: String,
    pub clips: Vec<ImportedClip>,
    pub node_count: usize,
    pub mesh_count: usize,
    pub skin_count: usize,
    pub joint_count: usize,
}

/// Image-based lighting and skybox payloads of one environment
#[derive(Debug, Clone)]
pub struct ImportedEnvironment {
    pub name: String,
    /// KTX1 file holding the prefiltered indirect light
    pub ibl: Vec<u8>,
    /// KTX1 file holding the skybox cubemap
    pub skybox: Vec<u8>,
    pub intensity: f32,
}

impl ImportedEnvironment {
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}
