//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path given as the CLI positional argument
//! 2. Default location:
//!    - **Linux/macOS:** `~/.toolhost-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.toolhost-mcp\config.json`
//!
//! The default file is optional. An explicit path must exist.

mod settings;

pub use settings::{
    Config, HttpConfig, LoggingConfig, ServerConfig, TransportKind, LOG_LEVELS,
};

use std::path::{Path, PathBuf};


use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.toolhost-mcp/`
/// - **Windows:** `%USERPROFILE%\.toolhost-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".toolhost-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads, parses and validates the configuration file at `path`.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - A field is invalid
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}

/// Picks the configuration file to load.
///
/// An explicit path is returned as-is, whether or not it exists. Otherwise the
/// default location is returned only if a file is there.
#[must_use]
pub fn locate_config(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|default| default.exists()),
    }
}

/// Loads the configuration, falling back to defaults when no file exists.
///
/// With `Some(path)` the file must exist. With `None` the default location is
/// tried and a missing file yields [`Config::default`].
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or if any file that is
/// found cannot be read, parsed or validated.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    locate_config(path).map_or_else(|| Ok(Config::default()), |path| load_config(&path))
}
