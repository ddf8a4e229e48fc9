//! Layered settings for the command line tool
//!
//! Settings start from defaults, are replaced by a TOML file when one is
//! given, and are then overridden by the environment.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads [`Settings`] from an optional TOML file and the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// A loader that uses the environment only
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from `path`. A missing file is logged and skipped.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Read settings from [`ConfigLoader::default_config_path`], if that file exists
    pub fn with_default_file(mut self) -> Self {
        self.config_file = Self::default_config_path().filter(|path| path.is_file());
        self
    }

    /// The file settings will be read from
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load and validate the settings
    pub fn load(&self) -> Result<Settings> {
        let settings = match &self.config_file {
            Some(path) if path.is_file() => {
                debug!("Reading settings from {}", path.display());
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("No configuration file at {}", path.display());
                Settings::default()
            }
            None => Settings::default(),
        };

        let settings = settings.merge_with_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// `<config dir>/dm-api/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dm-api").join("config.toml"))
    }
}
