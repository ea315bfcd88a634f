// Command handlers for the soundboard CLI

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soundboard_registry::{
    ConflictDetector, CorruptPolicy, Dispatch, LoadWarning, Notice, Registry, Soundboard,
    DEFAULT_VOLUME,
};
use soundboard_storage::{Container, MapStore};
use tracing::warn;

use crate::collaborators::{LoggingKeyCapture, LoggingPlayback, PresetPicker};
use crate::router::Commands;

/// Settings a command session needs from configuration
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub policy: CorruptPolicy,
    pub volume: f32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: CorruptPolicy::Fail,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// Run one command against a store
pub fn execute<S>(
    command: &Commands,
    store: S,
    options: &SessionOptions,
    out: &mut dyn Write,
) -> Result<()>
where
    S: MapStore + Clone + 'static,
{
    let mut board = match command {
        Commands::Check => return check(store, out),
        // Only `add` without a name goes through the picker
        Commands::Add { path, name: None } => open_board(store, options, Some(absolute(path)?))?,
        _ => open_board(store, options, None)?,
    };

    match command {
        Commands::List { json } => list(board.registry(), *json, out),
        Commands::Add { path, name: Some(name) } => {
            let path = absolute(path)?;
            board
                .add_sound(name.clone(), path.to_string_lossy().into_owned())
                .with_context(|| format!("Failed to add '{}'", name))?;
            writeln!(out, "Added '{}' ({})", name, path.display())?;
            Ok(())
        }
        Commands::Add { path, name: None } => {
            let name = board
                .prompt_add_sound()
                .with_context(|| format!("Failed to add {}", path.display()))?
                .context("No sound file chosen")?;
            writeln!(out, "Added '{}' ({})", name, path.display())?;
            Ok(())
        }
        Commands::Rename { old, new } => {
            let notices = board
                .rename_tile(old, new.clone())
                .with_context(|| format!("Failed to rename '{}'", old))?;
            report_notices(&notices, out)?;
            writeln!(out, "Renamed '{}' to '{}'", old, new)?;
            Ok(())
        }
        Commands::Bind { name, key } => {
            let notices = board
                .rebind_key(name, Some(key.clone()))
                .with_context(|| format!("Failed to bind '{}' to '{}'", name, key))?;
            report_notices(&notices, out)?;
            writeln!(out, "Bound '{}' to [{}]", name, key)?;
            Ok(())
        }
        Commands::Unbind { name } => {
            let notices = board
                .unbind_key(name)
                .with_context(|| format!("Failed to unbind '{}'", name))?;
            report_notices(&notices, out)?;
            writeln!(out, "Unbound '{}'", name)?;
            Ok(())
        }
        Commands::Delete { name } => {
            let notices = board
                .delete_tile(name)
                .with_context(|| format!("Failed to delete '{}'", name))?;
            report_notices(&notices, out)?;
            writeln!(out, "Deleted '{}'", name)?;
            Ok(())
        }
        Commands::Resolve { key } => {
            match board.registry().resolve_key_press(key) {
                Some(name) => writeln!(out, "{}", name)?,
                None => writeln!(out, "Key [{}] is not bound", key)?,
            }
            Ok(())
        }
        Commands::Play { name } => {
            let dispatch = board
                .trigger(name)
                .with_context(|| format!("Failed to play '{}'", name))?;
            match dispatch {
                Dispatch::Played { name } => writeln!(out, "Played '{}'", name)?,
                Dispatch::PlaybackFailed { error, .. } => {
                    report_notices(&[Notice::Playback(error)], out)?
                }
                Dispatch::Added { name } => writeln!(out, "Added '{}'", name)?,
                Dispatch::Cancelled => writeln!(out, "Cancelled")?,
                Dispatch::Unbound => {}
            }
            Ok(())
        }
        Commands::Check => Ok(()),
    }
}

/// Load the registry and hook every persisted key
fn open_board<S>(store: S, options: &SessionOptions, picked: Option<PathBuf>) -> Result<Soundboard>
where
    S: MapStore + 'static,
{
    let (registry, _warnings) =
        Registry::open_with(store, options.policy).context("Failed to load soundboard state")?;

    let mut board = Soundboard::new(
        registry,
        LoggingPlayback::new(),
        LoggingKeyCapture::new(),
        PresetPicker::new(picked),
    );
    for notice in board.start() {
        warn!("{}", notice);
    }
    board.set_volume(options.volume);
    Ok(board)
}

fn list(registry: &Registry, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "tiles": registry.tiles_map(),
            "bindings": registry.bindings_map(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    for tile in registry.tiles() {
        writeln!(out, "{:<24} {:<12} {}", tile.name, tile.key_label(), tile.action)?;
    }
    Ok(())
}

/// Load without repairing anything and report what a normal start would fix
///
/// A shared key is reported once, as a conflict, not again as the binding
/// the load would drop for it.
fn check<S>(store: S, out: &mut dyn Write) -> Result<()>
where
    S: MapStore + Clone + 'static,
{
    let mut problems = 0;
    let mut conflicting_keys = HashSet::new();

    match store.load(Container::Bindings) {
        Ok(bindings) => {
            for conflict in ConflictDetector::detect(&bindings) {
                problems += 1;
                conflicting_keys.insert(conflict.key.clone());
                writeln!(
                    out,
                    "conflict: key [{}] bound to {}",
                    conflict.key,
                    conflict.names.join(", ")
                )?;
            }
        }
        Err(e) if e.is_corrupt() => {}
        Err(e) => return Err(e).context("Failed to read key bindings"),
    }

    let (_, warnings) = Registry::open_with(store, CorruptPolicy::StartEmpty)
        .context("Failed to load soundboard state")?;
    for warning in &warnings {
        if let LoadWarning::DuplicateBinding { key, .. } = warning {
            if conflicting_keys.contains(key) {
                continue;
            }
        }
        problems += 1;
        writeln!(out, "warning: {}", warning)?;
    }

    if problems == 0 {
        writeln!(out, "No problems found")?;
    }
    Ok(())
}

fn report_notices(notices: &[Notice], out: &mut dyn Write) -> Result<()> {
    for notice in notices {
        writeln!(out, "warning: {}", notice)?;
    }
    Ok(())
}

/// Resolve a path against the working directory so stored paths survive a `cd`
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    Ok(cwd.join(path))
}
