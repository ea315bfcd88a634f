//! Container persistence backends
//!
//! # Storage Location
//!
//! [`FileSystemStore`] keeps both containers in one directory:
//!
//! ```text
//! <data_dir>/
//! ├── sounds.json         # tile name -> sound file path
//! └── key_bindings.json   # tile name -> logical key string
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use soundboard_storage::{Container, FileSystemStore, MapStore};
//!
//! let store = FileSystemStore::new("/tmp/soundboard")?;
//! let tiles = store.load(Container::Tiles)?;
//! store.save(Container::Tiles, &tiles)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::container::Container;
use crate::error::{Result, StoreError};
use crate::json_store::{self, JsonStoreError};
use crate::name_map::NameMap;

/// Trait for loading and saving name mappings
pub trait MapStore: Send + Sync {
    /// Load a container, returning an empty mapping if it does not exist
    fn load(&self, container: Container) -> Result<NameMap>;

    /// Atomically overwrite a container with the full mapping
    fn save(&self, container: Container, map: &NameMap) -> Result<()>;
}

/// File system based persistence
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    data_dir: PathBuf,
    tiles_file: String,
    bindings_file: String,
}

impl FileSystemStore {
    /// Create a store rooted at `data_dir` with the default file names
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_file_names(
            data_dir,
            Container::Tiles.default_file_name(),
            Container::Bindings.default_file_name(),
        )
    }

    /// Create a store with explicit container file names
    pub fn with_file_names(
        data_dir: impl AsRef<Path>,
        tiles_file: impl Into<String>,
        bindings_file: impl Into<String>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| StoreError::Storage {
                container: Container::Tiles,
                source: std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory {}: {}", data_dir.display(), e),
                ),
            })?;
        }

        Ok(FileSystemStore {
            data_dir,
            tiles_file: tiles_file.into(),
            bindings_file: bindings_file.into(),
        })
    }

    /// Path of the file backing a container
    pub fn container_path(&self, container: Container) -> PathBuf {
        match container {
            Container::Tiles => self.data_dir.join(&self.tiles_file),
            Container::Bindings => self.data_dir.join(&self.bindings_file),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl MapStore for FileSystemStore {
    fn load(&self, container: Container) -> Result<NameMap> {
        let path = self.container_path(container);

        let map: NameMap = json_store::load_json_or_default(&path).map_err(|e| match e {
            JsonStoreError::Io(source) => StoreError::Storage { container, source },
            JsonStoreError::Parse(e) | JsonStoreError::Serialize(e) => StoreError::Corrupt {
                container,
                message: format!("{}: {}", path.display(), e),
            },
        })?;

        debug!(%container, path = %path.display(), entries = map.len(), "Loaded container");
        Ok(map)
    }

    fn save(&self, container: Container, map: &NameMap) -> Result<()> {
        let path = self.container_path(container);

        json_store::save_json_atomic(&path, map).map_err(|e| match e {
            JsonStoreError::Io(source) => StoreError::Storage { container, source },
            JsonStoreError::Parse(e) | JsonStoreError::Serialize(e) => StoreError::Serialize {
                container,
                message: e.to_string(),
            },
        })?;

        debug!(%container, path = %path.display(), entries = map.len(), "Saved container");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    containers: HashMap<Container, NameMap>,
    corrupt: HashSet<Container>,
    failing: HashSet<Container>,
    saves: HashMap<Container, usize>,
}

/// In-memory store for embedding and tests
///
/// Clones share state. Containers can be marked corrupt (load fails) or
/// failing (save fails) to exercise recovery paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a container with content
    pub fn with_map(self, container: Container, map: NameMap) -> Self {
        self.state.lock().containers.insert(container, map);
        self
    }

    /// Make subsequent loads of `container` fail as corrupt
    pub fn mark_corrupt(&self, container: Container) {
        self.state.lock().corrupt.insert(container);
    }

    /// Toggle save failures for `container`
    pub fn set_failing(&self, container: Container, failing: bool) {
        let mut state = self.state.lock();
        if failing {
            state.failing.insert(container);
        } else {
            state.failing.remove(&container);
        }
    }

    /// Current persisted content of a container, if it was ever written
    pub fn snapshot(&self, container: Container) -> Option<NameMap> {
        self.state.lock().containers.get(&container).cloned()
    }

    /// Number of successful saves to a container
    pub fn save_count(&self, container: Container) -> usize {
        self.state.lock().saves.get(&container).copied().unwrap_or(0)
    }
}

impl MapStore for MemoryStore {
    fn load(&self, container: Container) -> Result<NameMap> {
        let state = self.state.lock();
        if state.corrupt.contains(&container) {
            return Err(StoreError::Corrupt {
                container,
                message: "content marked corrupt".to_string(),
            });
        }
        Ok(state.containers.get(&container).cloned().unwrap_or_default())
    }

    fn save(&self, container: Container, map: &NameMap) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing.contains(&container) {
            return Err(StoreError::Storage {
                container,
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "medium is not writable",
                ),
            });
        }
        state.containers.insert(container, map.clone());
        state.corrupt.remove(&container);
        *state.saves.entry(container).or_insert(0) += 1;
        Ok(())
    }
}
