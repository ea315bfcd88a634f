//! Error types for registry and collaborator operations

use std::path::PathBuf;

use soundboard_storage::StoreError;
use thiserror::Error;

use crate::models::ChangeSet;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur in the tile registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tile name cannot be empty")]
    EmptyName,

    #[error("Sound path cannot be empty for tile: {0}")]
    EmptyPath(String),

    #[error("Key binding cannot be empty")]
    EmptyKey,

    #[error("Tile already exists: {0}")]
    DuplicateName(String),

    #[error("Key '{key}' is already assigned to: {owner}")]
    DuplicateKey { key: String, owner: String },

    #[error("Tile not found: {0}")]
    NotFound(String),

    #[error("The '{0}' tile cannot be renamed or deleted")]
    ReservedTile(String),

    /// A container failed to decode at startup
    #[error("Corrupt state: {0}")]
    Corrupt(#[source] StoreError),

    /// A container could not be read at startup
    #[error("Failed to load state: {0}")]
    Load(#[source] StoreError),

    /// Persisting failed after the in-memory state already changed
    ///
    /// `changes` still has to reach the key-capture collaborator.
    #[error("Saved state may be out of sync with disk: {source}")]
    Storage {
        #[source]
        source: StoreError,
        changes: ChangeSet,
    },
}

impl RegistryError {
    /// Whether the operation was rejected before any state changed
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RegistryError::EmptyName
                | RegistryError::EmptyPath(_)
                | RegistryError::EmptyKey
                | RegistryError::DuplicateName(_)
                | RegistryError::DuplicateKey { .. }
                | RegistryError::NotFound(_)
                | RegistryError::ReservedTile(_)
        )
    }

    /// Key-capture changes still owed after a storage failure
    pub fn pending_changes(&self) -> Option<&ChangeSet> {
        match self {
            RegistryError::Storage { changes, .. } => Some(changes),
            _ => None,
        }
    }
}

/// Errors reported by the playback collaborator
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Could not play sound '{}': {message}", .path.display())]
    Failed { path: PathBuf, message: String },

    #[error("Playback device unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the key-capture collaborator
#[derive(Debug, Error)]
pub enum KeyBindingError {
    #[error("Could not bind key '{key}': {message}")]
    Rejected { key: String, message: String },

    #[error("Could not unbind key '{key}': {message}")]
    UnbindFailed { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundboard_storage::Container;

    #[test]
    fn test_validation_classification() {
        assert!(RegistryError::EmptyName.is_validation());
        assert!(RegistryError::DuplicateKey {
            key: "a".into(),
            owner: "Air Horn".into()
        }
        .is_validation());

        let storage = RegistryError::Storage {
            source: StoreError::Storage {
                container: Container::Tiles,
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            },
            changes: ChangeSet::default(),
        };
        assert!(!storage.is_validation());
        assert_eq!(storage.pending_changes(), Some(&ChangeSet::default()));
    }

    #[test]
    fn test_messages() {
        let err = RegistryError::DuplicateKey {
            key: "a".into(),
            owner: "Air Horn".into(),
        };
        assert_eq!(err.to_string(), "Key 'a' is already assigned to: Air Horn");

        let err = PlaybackError::Failed {
            path: PathBuf::from("/s/a.mp3"),
            message: "unsupported format".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not play sound '/s/a.mp3': unsupported format"
        );
    }
}
