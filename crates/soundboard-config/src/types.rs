//! Core configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use soundboard_storage::{Container, CorruptPolicy};

/// Main soundboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoundboardConfig {
    /// Directory holding both containers
    pub data_dir: PathBuf,
    /// Tiles container file name
    pub tiles_file: String,
    /// Bindings container file name
    pub bindings_file: String,
    /// Initial playback volume
    pub volume: f32,
    /// Recovery policy for a container that fails to decode
    pub on_corrupt: CorruptPolicy,
    /// Default tracing filter
    pub log_level: String,
}

impl SoundboardConfig {
    /// Default data directory, falling back to the working directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soundboard")
    }

    /// Full path of a container file
    pub fn container_path(&self, container: Container) -> PathBuf {
        match container {
            Container::Tiles => self.data_dir.join(&self.tiles_file),
            Container::Bindings => self.data_dir.join(&self.bindings_file),
        }
    }
}

impl Default for SoundboardConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            tiles_file: Container::Tiles.default_file_name().to_string(),
            bindings_file: Container::Bindings.default_file_name().to_string(),
            volume: 0.5,
            on_corrupt: CorruptPolicy::Fail,
            log_level: "info".to_string(),
        }
    }
}
