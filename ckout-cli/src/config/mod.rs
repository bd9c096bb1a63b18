//! Configuration module for the ckout CLI.
//!
//! Builds the [`ConfigStore`] from INI files and a TOML defaults file,
//! then reads [`CheckoutSettings`] from it.

pub mod defaults;
pub mod settings;

pub use settings::{CheckoutSettings, builtin_defaults};

use ckout_core::{ConfigError, ConfigStore};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read defaults file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse defaults file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loads the store from the configured paths.
pub struct SettingsLoader {
    config_paths: Vec<PathBuf>,
    defaults_path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a new loader. Later config paths override earlier ones.
    pub fn new(config_paths: Vec<PathBuf>, defaults_path: Option<impl AsRef<Path>>) -> Self {
        Self {
            config_paths,
            defaults_path: defaults_path.map(|p| p.as_ref().to_path_buf()),
        }
    }

    /// Build the store.
    ///
    /// This will:
    /// 1. Read the INI files, skipping unreadable ones
    /// 2. Start from the built-in defaults
    /// 3. Overlay the defaults file, if any
    pub fn load_store(&self) -> Result<ConfigStore, SettingsError> {
        let store = ConfigStore::from_paths(&self.config_paths)?;
        if store.read_paths().is_empty() {
            tracing::warn!(
                "No configuration file could be read from {:?}, using defaults only",
                self.config_paths
            );
        } else {
            tracing::info!("Configuration loaded from {:?}", store.read_paths());
        }

        Ok(store.with_defaults(self.defaults()?))
    }

    /// Load the store and the checkout settings from it.
    pub fn load(&self) -> Result<(ConfigStore, CheckoutSettings), SettingsError> {
        let store = self.load_store()?;
        let settings = CheckoutSettings::load(&store)?;
        settings.validate()?;
        Ok((store, settings))
    }

    fn defaults(&self) -> Result<ckout_core::Defaults, SettingsError> {
        let mut merged = builtin_defaults();
        if let Some(path) = &self.defaults_path {
            let overrides = defaults::load_defaults(path)?;
            tracing::debug!("Loaded {} default(s) from {:?}", overrides.len(), path);
            for (section, option, value) in overrides.iter() {
                merged.insert(section, option, value.clone());
            }
        }
        Ok(merged)
    }
}
