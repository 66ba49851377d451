//! Hoist Import - Asset importers
//!
//! Reads what the pose viewer needs from disk: clip metadata from glTF/GLB
//! models and the KTX image-based-lighting pair of an environment.

mod environment;
mod gltf_import;
mod types;

pub use environment::{
    environment_paths, load_environment, load_environment_dir, DEFAULT_IBL_INTENSITY,
    KTX1_IDENTIFIER,
};
pub use gltf_import::import_clips;
pub use types::{ImportedClip, ImportedEnvironment, ImportedModel};
