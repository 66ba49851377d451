//! KTX environment loader - indirect light and skybox of one environment
//!
//! An environment named `venetian_crossroads_2k` lives in
//! `<dir>/venetian_crossroads_2k/` as `venetian_crossroads_2k_ibl.ktx` and
//! `venetian_crossroads_2k_skybox.ktx`.

use crate::types::ImportedEnvironment;
use hoist_core::{HoistError, Result};
use log::info;
use std::path::{Path, PathBuf};

/// File identifier that opens every KTX 1.1 container
pub const KTX1_IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

/// Indirect light intensity used when none is configured
pub const DEFAULT_IBL_INTENSITY: f32 = 50_000.0;

/// Paths of the IBL and skybox files for an environment
pub fn environment_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    let root = dir.join(name);
    (
        root.join(format!("{}_ibl.ktx", name)),
        root.join(format!("{}_skybox.ktx", name)),
    )
}

/// Load the environment `name` from under `dir`
pub fn load_environment(dir: &Path, name: &str) -> Result<ImportedEnvironment> {
    let (ibl_path, skybox_path) = environment_paths(dir, name);
    let ibl = read_ktx(&ibl_path)?;
    let skybox = read_ktx(&skybox_path)?;
    info!(
        "Loaded environment '{}' (ibl {} bytes, skybox {} bytes)",
        name,
        ibl.len(),
        skybox.len()
    );
    Ok(ImportedEnvironment {
        name: name.to_string(),
        ibl,
        skybox,
        intensity: DEFAULT_IBL_INTENSITY,
    })
}

/// Load an environment from its own directory, named after the directory
pub fn load_environment_dir(path: &Path) -> Result<ImportedEnvironment> {
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        HoistError::EnvironmentError(format!("Not an environment directory: {}", path.display()))
    })?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    load_environment(parent, name)
}

fn read_ktx(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| {
        HoistError::EnvironmentError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    if !bytes.starts_with(&KTX1_IDENTIFIER) {
        return Err(HoistError::EnvironmentError(format!(
            "{} is not a KTX1 file",
            path.display()
        )));
    }
    Ok(bytes)
}
