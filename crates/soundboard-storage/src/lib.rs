//! Durable storage for soundboard state
//!
//! Two independent containers are persisted: the tiles container (tile name to
//! sound file path) and the bindings container (tile name to logical key
//! string). Both are flat JSON objects:
//!
//! ```json
//! {"Air Horn": "/sounds/airhorn.mp3"}
//! ```
//!
//! ```json
//! {"New": "n", "Air Horn": "a"}
//! ```
//!
//! Saves are atomic: a reader observes either the previous or the new
//! content, never a partial write. A missing container loads as an empty
//! mapping; malformed content is reported as [`StoreError::Corrupt`].

pub mod container;
pub mod error;
pub mod json_store;
pub mod name_map;
pub mod persistence;

pub use container::{Container, CorruptPolicy};
pub use error::{Result, StoreError};
pub use name_map::NameMap;
pub use persistence::{FileSystemStore, MapStore, MemoryStore};
