//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::SoundboardConfig,
};

const DEFAULT_ENV_PREFIX: &str = "SOUNDBOARD";

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soundboard")
            .join("config.toml")
    }

    /// Load configuration from the file and environment, then validate it
    ///
    /// A missing file is not an error; every field has a default.
    pub fn load_config(&self) -> Result<SoundboardConfig> {
        let builder = Config::builder()
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true));

        let config = builder.build()?;
        let loaded: SoundboardConfig = config.try_deserialize()?;
        self.validate_config(&loaded)?;

        debug!(path = %self.config_path.display(), data_dir = %loaded.data_dir.display(), "Loaded configuration");
        Ok(loaded)
    }

    /// Write configuration as TOML, creating the parent directory
    pub fn save_config(&self, config: &SoundboardConfig) -> Result<()> {
        self.validate_config(config)?;

        let toml = toml::to_string(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }

    pub fn validate_config(&self, config: &SoundboardConfig) -> Result<()> {
        if config.tiles_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "tiles_file must not be empty".to_string(),
            ));
        }
        if config.bindings_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bindings_file must not be empty".to_string(),
            ));
        }
        if config.tiles_file == config.bindings_file {
            return Err(ConfigError::Validation(format!(
                "tiles_file and bindings_file must differ, both are '{}'",
                config.tiles_file
            )));
        }
        if !(0.0..=1.0).contains(&config.volume) {
            return Err(ConfigError::Validation(format!(
                "volume must be between 0.0 and 1.0, got {}",
                config.volume
            )));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
