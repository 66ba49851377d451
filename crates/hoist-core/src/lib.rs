//! Hoist Core - Foundational types for the Hoist pose viewer
//!
//! Every other Hoist crate depends on this one for:
//! - `HoistError` - the shared error enum
//! - `Result` - alias over `HoistError`

mod error;

pub use error::{HoistError, Result};
