//! Soundboard configuration
//!
//! Settings come from an optional TOML file, overridden by `SOUNDBOARD_*`
//! environment variables.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::SoundboardConfig;
