//! glTF/GLB clip metadata importer

use crate::types::{ImportedClip, ImportedModel};
use hoist_core::{HoistError, Result};
use log::{debug, info};
use std::path::Path;

/// Import animation clip names and durations from a glTF or GLB file
pub fn import_clips<P: AsRef<Path>>(path: P) -> Result<ImportedModel> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path).map_err(|e| {
        HoistError::ImportError(format!("Failed to import glTF {}: {}", path.display(), e))
    })?;

    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut clips = Vec::new();
    for animation in document.animations() {
        let index = animation.index();
        let clip_name = animation
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("animation_{}", index));

        let mut duration = 0.0f32;
        let mut channel_count = 0;
        for channel in animation.channels() {
            channel_count += 1;
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            if let Some(inputs) = reader.read_inputs() {
                duration = inputs.fold(duration, f32::max);
            }
        }

        debug!(
            "Clip {} '{}': {} channels, {}s",
            index, clip_name, channel_count, duration
        );
        clips.push(ImportedClip {
            index,
            name: clip_name,
            duration,
            channel_count,
        });
    }

    let joint_count = document.skins().map(|s| s.joints().count()).sum();
    let model = ImportedModel {
        name,
        source_path: path.to_string_lossy().to_string(),
        clips,
        node_count: document.nodes().count(),
        mesh_count: document.meshes().count(),
        skin_count: document.skins().count(),
        joint_count,
    };
    info!(
        "Imported '{}' ({} clips, {} joints)",
        model.name,
        model.clips.len(),
        model.joint_count
    );
    Ok(model)
}
