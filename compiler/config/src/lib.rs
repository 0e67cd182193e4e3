#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! safegen Configuration
//!
//! This crate provides configuration management for safegen.
//! It handles loading, saving, and managing configuration files that specify:
//! - Project paths (extension root, safe-build output directory)
//! - Build options (extension name, inlined include prefix, optional generators)
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every field has a default, so a
//! partial file (or none at all) is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project paths
    pub paths: PathsConfig,
    /// Safe-build generation settings
    pub build: BuildConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Project path configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Extension project root (contains `ext/` and `build/`); located automatically when unset
    pub root_dir: Option<PathBuf>,
    /// Where to write the safe build; `<root>/build/safe` when unset
    pub output_dir: Option<PathBuf>,
}

/// Safe-build generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Extension name (e.g. "phalcon" → `php_phalcon.h`, `phalcon.c`)
    pub extension_name: String,
    /// Include prefix whose directives are inlined into the main header
    pub include_prefix: String,
    /// Emit `config.w32`; follows the host platform when unset
    pub windows_config: Option<bool>,
    /// Emit `Makefile.frag` from the build resources
    pub makefile_frag: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            extension_name: "phalcon".to_string(),
            include_prefix: "kernel/".to_string(),
            windows_config: None,
            makefile_frag: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl BuildConfig {
    /// Whether `config.w32` should be generated on this host
    pub fn windows_config_enabled(&self) -> bool { self.windows_config.unwrap_or(cfg!(windows)) }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `path` if given, else from the default path if
    /// that file exists, else fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Ok(default) if default.is_file() => Self::from_file(default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/safegen/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("safegen");
        Ok(config_dir.join("config.toml"))
    }
}
