//! Layered configuration
//!
//! Loaded with these layers of precedence (highest wins):
//! 1. Command-line flags (applied by the command itself)
//! 2. Environment variables: `HOIST_MODEL`, `HOIST_ENVIRONMENT`, `HOIST_SPEED`
//! 3. Project-local: `.hoist/config.toml`
//! 4. Global: `~/.hoist/config.toml`

use hoist_animation::{PoseMap, SpeedMultiplier};
use hoist_core::{HoistError, Result};
use hoist_import::DEFAULT_IBL_INTENSITY;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `[model]` table as written in a file
#[derive(Debug, Clone, Default, Deserialize)]
struct ModelLayer {
    #[serde(default)]
    path: Option<PathBuf>,
}

/// `[environment]` table as written in a file
#[derive(Debug, Clone, Default, Deserialize)]
struct EnvironmentLayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    ibl_intensity: Option<f32>,
}

/// `[playback]` table as written in a file
#[derive(Debug, Clone, Default, Deserialize)]
struct PlaybackLayer {
    #[serde(default)]
    pose: Option<String>,
    #[serde(default)]
    looping: Option<bool>,
    #[serde(default)]
    speed: Option<u32>,
    #[serde(default)]
    fps: Option<u32>,
}

/// One config file. Every key is optional so that files only override
/// what they mention.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    model: ModelLayer,
    #[serde(default)]
    environment: EnvironmentLayer,
    #[serde(default)]
    playback: PlaybackLayer,
    #[serde(default)]
    poses: Option<PoseMap>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct HoistConfig {
    pub model_path: Option<PathBuf>,
    pub environment: Option<String>,
    pub environment_dir: PathBuf,
    pub ibl_intensity: f32,
    /// Pose played once the model is attached
    pub pose: String,
    pub looping: bool,
    pub speed: SpeedMultiplier,
    /// Refresh rate of the headless frame driver
    pub fps: u32,
    pub poses: PoseMap,
}

impl Default for HoistConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            environment: None,
            environment_dir: PathBuf::from("envs"),
            ibl_intensity: DEFAULT_IBL_INTENSITY,
            pose: hoist_animation::poses::DOWN.to_string(),
            looping: false,
            speed: SpeedMultiplier::NORMAL,
            fps: 60,
            poses: PoseMap::default(),
        }
    }
}

impl HoistConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = HoistConfig::default();

        // Layer 1: Global config (~/.hoist/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.apply(Self::load_file(&global_path)?)?;
            }
        }

        // Layer 2: Project-local config (.hoist/config.toml)
        let local_path = PathBuf::from(".hoist/config.toml");
        if local_path.exists() {
            config.apply(Self::load_file(&local_path)?)?;
        }

        // Layer 3: Environment variable overrides
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Load config from a specific file path only, plus env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = HoistConfig::default();
        config.apply(Self::load_file(path)?)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".hoist").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ConfigLayer> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| {
            HoistError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn parse(content: &str) -> Result<ConfigLayer> {
        Ok(toml::from_str(content)?)
    }

    fn apply(&mut self, layer: ConfigLayer) -> Result<()> {
        if let Some(path) = layer.model.path {
            self.model_path = Some(path);
        }

        if let Some(name) = layer.environment.name {
            self.environment = Some(name);
        }
        if let Some(dir) = layer.environment.dir {
            self.environment_dir = dir;
        }
        if let Some(intensity) = layer.environment.ibl_intensity {
            self.ibl_intensity = intensity;
        }

        if let Some(pose) = layer.playback.pose {
            self.pose = pose;
        }
        if let Some(looping) = layer.playback.looping {
            self.looping = looping;
        }
        if let Some(speed) = layer.playback.speed {
            self.speed = parse_speed(speed)?;
        }
        if let Some(fps) = layer.playback.fps {
            if fps == 0 {
                return Err(HoistError::ConfigError("playback.fps must be at least 1".into()));
            }
            self.fps = fps;
        }

        if let Some(poses) = layer.poses {
            self.poses.merge(poses);
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("HOIST_MODEL") {
            self.model_path = Some(PathBuf::from(model));
        }
        if let Some(environment) = lookup("HOIST_ENVIRONMENT") {
            self.environment = Some(environment);
        }
        if let Some(speed) = lookup("HOIST_SPEED") {
            let value = speed.trim().parse::<u32>().map_err(|e| {
                HoistError::ConfigError(format!("HOIST_SPEED '{}' is not a number: {}", speed, e))
            })?;
            self.speed = parse_speed(value)?;
        }
        Ok(())
    }
}

fn parse_speed(value: u32) -> Result<SpeedMultiplier> {
    SpeedMultiplier::new(value)
        .ok_or_else(|| HoistError::ConfigError("playback speed must be at least 1".into()))
}
