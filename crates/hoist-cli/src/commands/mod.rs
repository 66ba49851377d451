//! CLI command implementations

pub mod clips;
pub mod play;
pub mod sample;
