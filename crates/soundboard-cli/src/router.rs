// Command routing and dispatch

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soundboard_config::ConfigManager;
use soundboard_storage::FileSystemStore;
use tracing::debug;

use crate::commands::{self, SessionOptions};
use crate::logging;

/// Soundboard - manage sound tiles and their keyboard shortcuts
#[derive(Parser, Debug)]
#[command(name = "soundboard")]
#[command(bin_name = "soundboard")]
#[command(about = "Manage soundboard tiles, sounds and key bindings")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: <config dir>/soundboard/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the tiles and bindings files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List tiles in display order
    List {
        /// Print the raw tiles and bindings mappings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a sound tile
    #[command(about = "Add a sound tile, named after the file unless --name is given")]
    Add {
        /// Sound file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Tile name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Rename a tile, keeping its sound and key
    Rename {
        #[arg(value_name = "OLD")]
        old: String,
        #[arg(value_name = "NEW")]
        new: String,
    },

    /// Bind a tile to a key
    Bind {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Clear a tile's key binding
    Unbind {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Delete a sound tile and its binding
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Show which tile a key triggers
    Resolve {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Run a tile's action as if it were clicked
    Play {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Report fixes needed to load the stored state, and conflicting keys
    Check,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to the matching handler
    pub fn route() -> Result<()> {
        let cli = Cli::parse();
        let stdout = std::io::stdout();
        Self::execute(&cli, &mut stdout.lock())
    }

    /// Load configuration, set up logging and run a command
    pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
        let manager = match &cli.config {
            Some(path) => ConfigManager::with_path(path),
            None => ConfigManager::new(),
        };
        let mut config = manager.load_config().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                manager.config_path().display()
            )
        })?;

        if let Some(data_dir) = &cli.data_dir {
            config.data_dir = data_dir.clone();
        }

        logging::init_logging(cli.verbose, cli.quiet, &config.log_level);
        debug!(command = ?cli.command, data_dir = %config.data_dir.display(), "Running command");

        let store = FileSystemStore::with_file_names(
            &config.data_dir,
            &config.tiles_file,
            &config.bindings_file,
        )
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?;

        let options = SessionOptions {
            policy: config.on_corrupt,
            volume: config.volume,
        };
        commands::execute(&cli.command, store, &options, out)
    }
}
