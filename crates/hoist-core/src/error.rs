//! Error types for Hoist

use thiserror::Error;

/// The main error type for Hoist operations
#[derive(Debug, Error)]
pub enum HoistError {
    #[error("Invalid clip index: {index} (model has {count} clips)")]
    InvalidClipIndex { index: usize, count: usize },

    #[error("Playback is not ready: no model has been attached")]
    NotReady,

    #[error("Unknown pose: {0}")]
    UnknownPose(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Environment error: {0}")]
    EnvironmentError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for Hoist operations
pub type Result<T> = std::result::Result<T, HoistError>;

impl From<toml::de::Error> for HoistError {
    fn from(err: toml::de::Error) -> Self {
        HoistError::TomlParseError(err.to_string())
    }
}
