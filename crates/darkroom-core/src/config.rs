//! Configuration management for Darkroom.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Only the EXIF strategy has a real configuration surface; the
//! greyscale and resize prefixes are fixed literals by design.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Darkroom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// EXIF strategy settings
    pub exif: ExifConfig,

    /// Object storage settings (CLI filesystem backend)
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// ~/.darkroom/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "darkroom", "darkroom")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".darkroom").join("config.toml")
            })
    }

    /// Get the resolved storage root path (with ~ expansion).
    pub fn storage_root(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.root);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// EXIF strategy settings, static at deploy time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifConfig {
    /// Bucket to upload extracted metadata to. `None` means the source bucket.
    pub target_bucket: Option<String>,

    /// Key prefix for extracted metadata files
    pub target_prefix: String,
}

impl Default for ExifConfig {
    fn default() -> Self {
        Self {
            target_bucket: None,
            target_prefix: "exif".to_string(),
        }
    }
}

impl ExifConfig {
    /// The prefix with its trailing separator enforced.
    pub fn normalized_prefix(&self) -> String {
        if self.target_prefix.is_empty() || self.target_prefix.ends_with('/') {
            self.target_prefix.clone()
        } else {
            format!("{}/", self.target_prefix)
        }
    }
}

/// Object storage settings for the CLI's filesystem backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `<bucket>/<key>` object files
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "~/.darkroom/objects".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
