//! Core data models for tiles and key bindings

use std::fmt;

use serde::Serialize;

/// Name of the built-in tile that prompts for a new sound
pub const RESERVED_TILE: &str = "New";

/// What happens when a tile is clicked or its key is pressed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum TileAction {
    /// Play the sound file at this path
    Play(String),
    /// Ask the user for a file and add it as a new tile
    PromptAdd,
}

impl TileAction {
    /// Sound file path, if this action plays one
    pub fn sound_path(&self) -> Option<&str> {
        match self {
            TileAction::Play(path) => Some(path),
            TileAction::PromptAdd => None,
        }
    }
}

impl fmt::Display for TileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileAction::Play(path) => write!(f, "play {}", path),
            TileAction::PromptAdd => write!(f, "prompt add sound"),
        }
    }
}

/// A named trigger with its action and optional key binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub name: String,
    pub action: TileAction,
    pub key: Option<String>,
}

impl Tile {
    /// A tile that plays `path`
    pub fn sound(name: impl Into<String>, path: impl Into<String>) -> Self {
        Tile {
            name: name.into(),
            action: TileAction::Play(path.into()),
            key: None,
        }
    }

    /// The built-in "New" tile
    pub fn reserved() -> Self {
        Tile {
            name: RESERVED_TILE.to_string(),
            action: TileAction::PromptAdd,
            key: None,
        }
    }

    /// Whether this is the built-in tile, which cannot be renamed or deleted
    pub fn is_reserved(&self) -> bool {
        matches!(self.action, TileAction::PromptAdd)
    }

    /// Label shown under the tile: `[key]`, or empty when unbound
    pub fn key_label(&self) -> String {
        self.key
            .as_deref()
            .map(|key| format!("[{}]", key))
            .unwrap_or_default()
    }

    /// The live binding for this tile, if it has a key
    pub fn binding(&self) -> Option<Binding> {
        self.key.as_ref().map(|key| Binding {
            key: key.clone(),
            name: self.name.clone(),
            action: self.action.clone(),
        })
    }
}

/// A logical key bound to a tile's action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub key: String,
    pub name: String,
    pub action: TileAction,
}

/// Key-capture instructions produced by a registry mutation
///
/// `unbind` must be applied before `bind` so a key never maps to two actions
/// at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub unbind: Option<String>,
    pub bind: Option<Binding>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.unbind.is_none() && self.bind.is_none()
    }
}
