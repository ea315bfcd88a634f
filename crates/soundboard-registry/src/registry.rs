//! Tile registry with key-binding bookkeeping

use std::collections::{BTreeSet, HashMap};

use soundboard_storage::{Container, CorruptPolicy, MapStore, NameMap, StoreError};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::models::{Binding, ChangeSet, Tile, TileAction};
use crate::reconcile::{self, LoadWarning};

/// In-memory authority for tiles and their key bindings
///
/// Invariants:
/// - tile names are non-empty and pairwise distinct, the reserved tile included
/// - every bound key belongs to exactly one tile
/// - `by_key` is the exact inverse of the tiles' keys
///
/// Every mutation validates first, then changes memory, then saves each
/// affected container in full.
pub struct Registry {
    store: Box<dyn MapStore>,
    /// Tiles in display order; the reserved tile is always first
    tiles: Vec<Tile>,
    /// Map from logical key to tile name
    by_key: HashMap<String, String>,
    /// Containers reset at load that still hold their corrupt content on disk
    dirty: BTreeSet<Container>,
}

impl Registry {
    /// Load both containers, failing on the first corrupt one
    pub fn open(store: impl MapStore + 'static) -> Result<Self> {
        Self::open_with(store, CorruptPolicy::Fail).map(|(registry, _)| registry)
    }

    /// Load both containers with an explicit recovery policy
    ///
    /// Returns the registry and every fix applied along the way. Nothing is
    /// written back until the next mutation or [`Registry::save_all`]; a
    /// container reset to empty is saved with that next write, whichever
    /// container the mutation touches.
    pub fn open_with(
        store: impl MapStore + 'static,
        policy: CorruptPolicy,
    ) -> Result<(Self, Vec<LoadWarning>)> {
        let store: Box<dyn MapStore> = Box::new(store);
        let mut warnings = Vec::new();

        let tiles_map = load_container(&*store, Container::Tiles, policy, &mut warnings)?;
        let bindings_map =
            load_container(&*store, Container::Bindings, policy, &mut warnings)?;

        let reconciled = reconcile::reconcile(tiles_map, bindings_map);
        warnings.extend(reconciled.warnings);

        for warning in &warnings {
            warn!("Load fix: {}", warning);
        }

        let dirty = warnings
            .iter()
            .filter_map(|warning| match warning {
                LoadWarning::ContainerReset { container, .. } => Some(*container),
                _ => None,
            })
            .collect();

        let registry = Registry {
            store,
            tiles: reconciled.tiles,
            by_key: reconciled.by_key,
            dirty,
        };
        info!(
            tiles = registry.len(),
            bindings = registry.by_key.len(),
            "Registry loaded"
        );

        Ok((registry, warnings))
    }

    /// All tiles in display order, the reserved tile first
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Lookup a tile by name
    pub fn tile(&self, name: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.name == name)
    }

    /// Whether `name` is taken, the reserved name included
    pub fn contains(&self, name: &str) -> bool {
        self.tile(name).is_some()
    }

    /// Number of sound tiles (the reserved tile is not counted)
    pub fn len(&self) -> usize {
        self.tiles.len() - 1
    }

    /// Check if there are no sound tiles
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Action run by a tile
    pub fn action_for(&self, name: &str) -> Option<&TileAction> {
        self.tile(name).map(|t| &t.action)
    }

    /// Key bound to a tile
    pub fn key_for(&self, name: &str) -> Option<&str> {
        self.tile(name).and_then(|t| t.key.as_deref())
    }

    /// Label shown under a tile: `[key]`, or empty
    pub fn key_label(&self, name: &str) -> String {
        self.tile(name).map(Tile::key_label).unwrap_or_default()
    }

    /// Tile name bound to a logical key
    pub fn resolve_key_press(&self, key: &str) -> Option<&str> {
        let name = self.by_key.get(key).map(String::as_str);
        debug!(key, resolved = ?name, "Resolved key press");
        name
    }

    /// Every live binding, in display order
    ///
    /// Used at startup to register all persisted keys with the key-capture
    /// collaborator.
    pub fn bind_all(&self) -> Vec<Binding> {
        self.tiles.iter().filter_map(Tile::binding).collect()
    }

    /// Tiles container content: sound tiles only, in display order
    pub fn tiles_map(&self) -> NameMap {
        self.tiles
            .iter()
            .filter_map(|t| t.action.sound_path().map(|path| (t.name.as_str(), path)))
            .collect()
    }

    /// Bindings container content, in display order
    pub fn bindings_map(&self) -> NameMap {
        self.tiles
            .iter()
            .filter_map(|t| t.key.as_deref().map(|key| (t.name.as_str(), key)))
            .collect()
    }

    /// Add a sound tile with no key binding
    pub fn add_sound(&mut self, name: impl Into<String>, path: impl Into<String>) -> Result<()> {
        let name = name.into();
        let path = path.into();

        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.contains(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        if path.is_empty() {
            return Err(RegistryError::EmptyPath(name));
        }

        info!(name = %name, path = %path, "Added sound tile");
        self.tiles.push(Tile::sound(name, path));

        self.persist(&[Container::Tiles], ChangeSet::default())
            .map(|_| ())
    }

    /// Rename a tile, carrying its sound and key binding along
    ///
    /// The tile keeps its position. If it has a key, the returned change-set
    /// re-registers that key under the new name.
    pub fn rename_tile(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<ChangeSet> {
        let new_name = new_name.into();

        let index = self
            .position(old_name)
            .ok_or_else(|| RegistryError::NotFound(old_name.to_string()))?;
        if self.tiles[index].is_reserved() {
            return Err(RegistryError::ReservedTile(old_name.to_string()));
        }
        if new_name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.contains(&new_name) {
            return Err(RegistryError::DuplicateName(new_name));
        }

        let tile = &mut self.tiles[index];
        tile.name = new_name.clone();

        let changes = match tile.binding() {
            Some(binding) => {
                self.by_key.insert(binding.key.clone(), new_name.clone());
                ChangeSet {
                    unbind: Some(binding.key.clone()),
                    bind: Some(binding),
                }
            }
            None => ChangeSet::default(),
        };

        info!(from = %old_name, to = %new_name, "Renamed tile");
        self.persist(&[Container::Tiles, Container::Bindings], changes)
    }

    /// Bind a tile to `new_key`, or remove its binding when `None`
    ///
    /// Binding a tile to the key it already has, or clearing an unbound
    /// tile, is a no-op: it returns an empty change-set and does not save.
    pub fn rebind_key(&mut self, name: &str, new_key: Option<String>) -> Result<ChangeSet> {
        let index = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let old_key = self.tiles[index].key.clone();

        let changes = match new_key {
            Some(key) => {
                if key.is_empty() {
                    return Err(RegistryError::EmptyKey);
                }
                if let Some(owner) = self.by_key.get(&key) {
                    if owner != name {
                        return Err(RegistryError::DuplicateKey {
                            key,
                            owner: owner.clone(),
                        });
                    }
                    // Already bound to this tile
                    return Ok(ChangeSet::default());
                }

                if let Some(old) = &old_key {
                    self.by_key.remove(old);
                }
                self.by_key.insert(key.clone(), name.to_string());

                let tile = &mut self.tiles[index];
                tile.key = Some(key.clone());
                info!(name = %name, key = %key, previous = ?old_key, "Bound key");

                ChangeSet {
                    unbind: old_key,
                    bind: tile.binding(),
                }
            }
            None => {
                let Some(old) = old_key else {
                    return Ok(ChangeSet::default());
                };

                self.by_key.remove(&old);
                self.tiles[index].key = None;
                info!(name = %name, key = %old, "Removed key binding");

                ChangeSet {
                    unbind: Some(old),
                    bind: None,
                }
            }
        };

        self.persist(&[Container::Bindings], changes)
    }

    /// Remove a tile's key binding
    pub fn unbind_key(&mut self, name: &str) -> Result<ChangeSet> {
        self.rebind_key(name, None)
    }

    /// Delete a sound tile and its key binding
    pub fn delete_tile(&mut self, name: &str) -> Result<ChangeSet> {
        let index = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if self.tiles[index].is_reserved() {
            return Err(RegistryError::ReservedTile(name.to_string()));
        }

        let tile = self.tiles.remove(index);
        if let Some(key) = &tile.key {
            self.by_key.remove(key);
        }
        info!(name = %name, key = ?tile.key, "Deleted tile");

        let changes = ChangeSet {
            unbind: tile.key,
            bind: None,
        };
        self.persist(&[Container::Tiles, Container::Bindings], changes)
    }

    /// Write both containers from the current in-memory state
    pub fn save_all(&mut self) -> Result<()> {
        self.persist(&Container::ALL, ChangeSet::default())
            .map(|_| ())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tiles.iter().position(|t| t.name == name)
    }

    /// Save each container plus any still-dirty one, attempting all of them
    /// even after a failure
    fn persist(&mut self, containers: &[Container], changes: ChangeSet) -> Result<ChangeSet> {
        let mut first_error: Option<StoreError> = None;

        let targets: BTreeSet<Container> = containers
            .iter()
            .copied()
            .chain(self.dirty.iter().copied())
            .collect();

        for container in targets {
            let map = match container {
                Container::Tiles => self.tiles_map(),
                Container::Bindings => self.bindings_map(),
            };
            match self.store.save(container, &map) {
                Ok(()) => {
                    if self.dirty.remove(&container) {
                        info!(%container, "Replaced corrupt container");
                    }
                }
                Err(e) => {
                    warn!(%container, error = %e, "Failed to persist container, keeping in-memory state");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => Err(RegistryError::Storage { source, changes }),
            None => Ok(changes),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tiles", &self.tiles)
            .field("by_key", &self.by_key)
            .finish_non_exhaustive()
    }
}

fn load_container(
    store: &dyn MapStore,
    container: Container,
    policy: CorruptPolicy,
    warnings: &mut Vec<LoadWarning>,
) -> Result<NameMap> {
    match store.load(container) {
        Ok(map) => Ok(map),
        Err(e) if e.is_corrupt() => match policy {
            CorruptPolicy::Fail => Err(RegistryError::Corrupt(e)),
            CorruptPolicy::StartEmpty => {
                warnings.push(LoadWarning::ContainerReset {
                    container,
                    reason: e.to_string(),
                });
                Ok(NameMap::new())
            }
        },
        Err(e) => Err(RegistryError::Load(e)),
    }
}
