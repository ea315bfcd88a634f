//! Interfaces to the playback, key-capture and file-picker collaborators
//!
//! The registry never touches audio devices, OS key hooks or dialogs. These
//! traits are the seams where a front end plugs them in.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{KeyBindingError, PlaybackError};
use crate::models::Binding;

/// Audio output
pub trait Playback {
    /// Start playing a sound file, replacing whatever is playing
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Stop playback
    fn stop(&mut self);

    /// Set output volume in `0.0..=1.0`
    fn set_volume(&mut self, volume: f32);
}

/// Global key capture
///
/// Implementations deliver key presses back through
/// [`Soundboard::press`](crate::Soundboard::press) or dispatch on the
/// [`Binding`]'s action directly.
pub trait KeyCapture {
    /// Start capturing `binding.key`
    fn bind(&mut self, binding: &Binding) -> Result<(), KeyBindingError>;

    /// Stop capturing `key`
    fn unbind(&mut self, key: &str) -> Result<(), KeyBindingError>;
}

/// Audio file chooser
pub trait FilePicker {
    /// Ask the user for a file; `None` means cancelled
    fn choose_audio_file(&mut self) -> Option<PathBuf>;
}

/// Non-fatal collaborator failure to show the user
#[derive(Debug)]
pub enum Notice {
    KeyBinding(KeyBindingError),
    Playback(PlaybackError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::KeyBinding(e) => write!(f, "Key binding error: {}", e),
            Notice::Playback(e) => write!(f, "Playback error: {}", e),
        }
    }
}

impl From<KeyBindingError> for Notice {
    fn from(e: KeyBindingError) -> Self {
        Notice::KeyBinding(e)
    }
}

impl From<PlaybackError> for Notice {
    fn from(e: PlaybackError) -> Self {
        Notice::Playback(e)
    }
}
