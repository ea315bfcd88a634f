//! Container identifiers and corrupt-state recovery policy

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two independently persisted mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    /// Tile name to sound file path
    Tiles,
    /// Tile name to logical key string
    Bindings,
}

impl Container {
    /// All containers, in load order
    pub const ALL: [Container; 2] = [Container::Tiles, Container::Bindings];

    /// File name used when no override is configured
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Container::Tiles => "sounds.json",
            Container::Bindings => "key_bindings.json",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Tiles => write!(f, "tiles"),
            Container::Bindings => write!(f, "bindings"),
        }
    }
}

/// What to do when a container fails to decode at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptPolicy {
    /// Surface the error and abort loading
    #[default]
    Fail,
    /// Report the error and continue with an empty mapping for that container
    StartEmpty,
}
