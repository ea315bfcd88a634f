//! Soundboard engine that wires the registry to its collaborators

use std::path::Path;

use tracing::{info, warn};

use crate::collaborators::{FilePicker, KeyCapture, Notice, Playback};
use crate::error::{PlaybackError, RegistryError, Result};
use crate::models::{ChangeSet, TileAction};
use crate::registry::Registry;

/// Default output volume
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Result of running a tile's action
#[derive(Debug)]
pub enum Dispatch {
    /// A sound tile started playing
    Played { name: String },
    /// A sound tile failed to play; registry state is unaffected
    PlaybackFailed { name: String, error: PlaybackError },
    /// The reserved tile added a new sound tile
    Added { name: String },
    /// The reserved tile's file picker was cancelled
    Cancelled,
    /// No tile is bound to the pressed key
    Unbound,
}

/// Main soundboard engine combining the registry and collaborators
///
/// Every mutation goes through the registry, then the resulting change-set
/// is applied to key capture, unbind first. Key-capture and playback failures
/// never roll back registry state; they come back as [`Notice`]s.
pub struct Soundboard {
    registry: Registry,
    playback: Box<dyn Playback>,
    capture: Box<dyn KeyCapture>,
    picker: Box<dyn FilePicker>,
    volume: f32,
}

impl Soundboard {
    /// Create a new soundboard engine
    pub fn new(
        registry: Registry,
        playback: impl Playback + 'static,
        capture: impl KeyCapture + 'static,
        picker: impl FilePicker + 'static,
    ) -> Self {
        Soundboard {
            registry,
            playback: Box::new(playback),
            capture: Box::new(capture),
            picker: Box::new(picker),
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register every persisted key and push the initial volume
    pub fn start(&mut self) -> Vec<Notice> {
        self.playback.set_volume(self.volume);

        let mut notices = Vec::new();
        for binding in self.registry.bind_all() {
            if let Err(e) = self.capture.bind(&binding) {
                warn!(key = %binding.key, name = %binding.name, error = %e, "Failed to bind key");
                notices.push(Notice::KeyBinding(e));
            }
        }
        notices
    }

    /// Add a sound tile
    pub fn add_sound(&mut self, name: impl Into<String>, path: impl Into<String>) -> Result<()> {
        self.registry.add_sound(name, path)
    }

    /// Ask the file picker for a sound and add it, named after the file stem
    ///
    /// Returns the new tile's name, or `None` if the picker was cancelled.
    pub fn prompt_add_sound(&mut self) -> Result<Option<String>> {
        let Some(path) = self.picker.choose_audio_file() else {
            info!("Add sound cancelled");
            return Ok(None);
        };

        let name = tile_name_for(&path);
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        self.registry
            .add_sound(name.clone(), path.to_string_lossy().into_owned())?;
        Ok(Some(name))
    }

    /// Rename a tile
    pub fn rename_tile(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<Vec<Notice>> {
        let result = self.registry.rename_tile(old_name, new_name);
        self.sync(result)
    }

    /// Bind a tile to a key, or clear its binding with `None`
    pub fn rebind_key(&mut self, name: &str, new_key: Option<String>) -> Result<Vec<Notice>> {
        let result = self.registry.rebind_key(name, new_key);
        self.sync(result)
    }

    /// Clear a tile's key binding
    pub fn unbind_key(&mut self, name: &str) -> Result<Vec<Notice>> {
        let result = self.registry.unbind_key(name);
        self.sync(result)
    }

    /// Delete a sound tile
    pub fn delete_tile(&mut self, name: &str) -> Result<Vec<Notice>> {
        let result = self.registry.delete_tile(name);
        self.sync(result)
    }

    /// Handle a captured key press
    pub fn press(&mut self, key: &str) -> Result<Dispatch> {
        match self.registry.resolve_key_press(key) {
            Some(name) => {
                let name = name.to_string();
                self.trigger(&name)
            }
            None => Ok(Dispatch::Unbound),
        }
    }

    /// Run a tile's action, as on a click
    pub fn trigger(&mut self, name: &str) -> Result<Dispatch> {
        let action = self
            .registry
            .action_for(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        match action {
            TileAction::Play(path) => match self.playback.play(Path::new(&path)) {
                Ok(()) => Ok(Dispatch::Played {
                    name: name.to_string(),
                }),
                Err(error) => {
                    warn!(name = %name, error = %error, "Playback failed");
                    Ok(Dispatch::PlaybackFailed {
                        name: name.to_string(),
                        error,
                    })
                }
            },
            TileAction::PromptAdd => Ok(match self.prompt_add_sound()? {
                Some(name) => Dispatch::Added { name },
                None => Dispatch::Cancelled,
            }),
        }
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Set output volume, clamped to `0.0..=1.0`
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_nan() { DEFAULT_VOLUME } else { volume.clamp(0.0, 1.0) };
        self.volume = volume;
        self.playback.set_volume(volume);
        volume
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Apply a change-set to key capture, unbind before bind
    pub fn apply(&mut self, changes: &ChangeSet) -> Vec<Notice> {
        let mut notices = Vec::new();

        if let Some(key) = &changes.unbind {
            if let Err(e) = self.capture.unbind(key) {
                warn!(key = %key, error = %e, "Failed to unbind key");
                notices.push(Notice::KeyBinding(e));
            }
        }

        if let Some(binding) = &changes.bind {
            if let Err(e) = self.capture.bind(binding) {
                warn!(key = %binding.key, name = %binding.name, error = %e, "Failed to bind key");
                notices.push(Notice::KeyBinding(e));
            }
        }

        notices
    }

    /// Apply the change-set of a registry result, including one carried by a
    /// storage failure
    fn sync(&mut self, result: Result<ChangeSet>) -> Result<Vec<Notice>> {
        match result {
            Ok(changes) => Ok(self.apply(&changes)),
            Err(RegistryError::Storage { source, changes }) => {
                for notice in self.apply(&changes) {
                    warn!("{}", notice);
                }
                Err(RegistryError::Storage { source, changes })
            }
            Err(e) => Err(e),
        }
    }
}

/// Tile name derived from a sound file path: its stem
fn tile_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
