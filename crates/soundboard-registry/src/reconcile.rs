//! Load-time reconciliation of persisted containers
//!
//! The two containers are written independently, so what is on disk may not
//! satisfy the registry invariants (a crash between saves, hand edits, files
//! from older versions). Every entry that has to be dropped is reported as a
//! [`LoadWarning`].

use std::collections::HashMap;
use std::fmt;

use soundboard_storage::{Container, NameMap};

use crate::models::{Tile, RESERVED_TILE};

/// A fix applied while loading persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A corrupt container was replaced by an empty mapping
    ContainerReset { container: Container, reason: String },
    /// A stored tile used the reserved name
    ReservedTileName { path: String },
    /// A stored tile had an empty name
    EmptyTileName { path: String },
    /// A stored tile had no sound path
    EmptySoundPath { name: String },
    /// A binding referred to a tile that does not exist
    OrphanBinding { name: String, key: String },
    /// A binding had an empty key
    EmptyKey { name: String },
    /// A binding reused a key already owned by an earlier tile
    DuplicateBinding {
        name: String,
        key: String,
        owner: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::ContainerReset { container, reason } => {
                write!(f, "{} container reset to empty: {}", container, reason)
            }
            LoadWarning::ReservedTileName { path } => {
                write!(f, "dropped tile using reserved name '{}' ({})", RESERVED_TILE, path)
            }
            LoadWarning::EmptyTileName { path } => {
                write!(f, "dropped tile with empty name ({})", path)
            }
            LoadWarning::EmptySoundPath { name } => {
                write!(f, "dropped tile '{}' with empty sound path", name)
            }
            LoadWarning::OrphanBinding { name, key } => {
                write!(f, "dropped key '{}' bound to unknown tile '{}'", key, name)
            }
            LoadWarning::EmptyKey { name } => write!(f, "dropped empty key for '{}'", name),
            LoadWarning::DuplicateBinding { name, key, owner } => write!(
                f,
                "dropped key '{}' for '{}': already bound to '{}'",
                key, name, owner
            ),
        }
    }
}

/// Registry state rebuilt from persisted containers
#[derive(Debug)]
pub(crate) struct Reconciled {
    pub tiles: Vec<Tile>,
    pub by_key: HashMap<String, String>,
    pub warnings: Vec<LoadWarning>,
}

/// Rebuild tiles and key index, dropping entries that break an invariant
///
/// The reserved tile always comes first. Tiles keep container order. When two
/// names share a key, the one listed first in the bindings container keeps it.
pub(crate) fn reconcile(tiles_map: NameMap, bindings_map: NameMap) -> Reconciled {
    let mut tiles = vec![Tile::reserved()];
    let mut by_key: HashMap<String, String> = HashMap::new();
    let mut warnings = Vec::new();

    for (name, path) in tiles_map {
        if name.is_empty() {
            warnings.push(LoadWarning::EmptyTileName { path });
        } else if name == RESERVED_TILE {
            warnings.push(LoadWarning::ReservedTileName { path });
        } else if path.is_empty() {
            warnings.push(LoadWarning::EmptySoundPath { name });
        } else {
            tiles.push(Tile::sound(name, path));
        }
    }

    for (name, key) in bindings_map {
        let Some(tile) = tiles.iter_mut().find(|t| t.name == name) else {
            warnings.push(LoadWarning::OrphanBinding { name, key });
            continue;
        };

        if key.is_empty() {
            warnings.push(LoadWarning::EmptyKey { name });
            continue;
        }

        if let Some(owner) = by_key.get(&key) {
            warnings.push(LoadWarning::DuplicateBinding {
                name,
                key,
                owner: owner.clone(),
            });
            continue;
        }

        by_key.insert(key.clone(), name);
        tile.key = Some(key);
    }

    Reconciled {
        tiles,
        by_key,
        warnings,
    }
}
