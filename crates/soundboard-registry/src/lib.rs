//! Tile, sound and key-binding registry
//!
//! This crate keeps three correlated maps consistent:
//! - tile name to action (play a sound file, or prompt to add one)
//! - tile name to logical key string
//! - logical key string to tile name
//!
//! Every mutation is validated before anything changes, persisted through a
//! [`soundboard_storage::MapStore`], and answered with a [`ChangeSet`]
//! telling the key-capture collaborator what to unbind and bind.
//! [`Soundboard`] wires the registry to playback, key capture and file
//! picking collaborators.

pub mod collaborators;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod registry;

// Re-export public types
pub use collaborators::{FilePicker, KeyCapture, Notice, Playback};
pub use conflict::{Conflict, ConflictDetector};
pub use engine::{Dispatch, Soundboard, DEFAULT_VOLUME};
pub use error::{KeyBindingError, PlaybackError, RegistryError, Result};
pub use models::{Binding, ChangeSet, Tile, TileAction, RESERVED_TILE};
pub use reconcile::LoadWarning;
pub use registry::Registry;
pub use soundboard_storage::{Container, CorruptPolicy};
