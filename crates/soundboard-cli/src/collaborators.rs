//! Headless collaborators for the command-line front end
//!
//! The CLI has no audio device, global key hook or file dialog. Playback and
//! key capture only log what a desktop front end would do; the file picker
//! hands back a path given on the command line.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use soundboard_registry::{Binding, FilePicker, KeyBindingError, KeyCapture, Playback, PlaybackError};
use tracing::{debug, info};

/// Playback that checks the file exists and logs instead of playing
#[derive(Debug, Default)]
pub struct LoggingPlayback {
    volume: f32,
}

impl LoggingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Playback for LoggingPlayback {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::Failed {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        info!(path = %path.display(), volume = self.volume, "Playing sound");
        Ok(())
    }

    fn stop(&mut self) {
        info!("Stopping playback");
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(volume, "Setting volume");
        self.volume = volume;
    }
}

/// Key capture that tracks which keys would be hooked
#[derive(Debug, Default)]
pub struct LoggingKeyCapture {
    bound: HashMap<String, String>,
}

impl LoggingKeyCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the tile currently hooked to `key`
    pub fn bound_to(&self, key: &str) -> Option<&str> {
        self.bound.get(key).map(String::as_str)
    }
}

impl KeyCapture for LoggingKeyCapture {
    fn bind(&mut self, binding: &Binding) -> Result<(), KeyBindingError> {
        debug!(key = %binding.key, name = %binding.name, action = %binding.action, "Hooking key");
        self.bound.insert(binding.key.clone(), binding.name.clone());
        Ok(())
    }

    fn unbind(&mut self, key: &str) -> Result<(), KeyBindingError> {
        if self.bound.remove(key).is_none() {
            return Err(KeyBindingError::UnbindFailed {
                key: key.to_string(),
                message: "key was not hooked".to_string(),
            });
        }
        debug!(key = %key, "Unhooking key");
        Ok(())
    }
}

/// File picker that returns a preset path once, then reports cancellation
#[derive(Debug, Default)]
pub struct PresetPicker {
    path: Option<PathBuf>,
}

impl PresetPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for PresetPicker {
    fn choose_audio_file(&mut self) -> Option<PathBuf> {
        self.path.take()
    }
}
