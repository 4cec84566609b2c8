//! Centralized application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory
//! resolution.
//!
//! # Environment Overrides
//!
//! - `SENTISCOPE_DATA_DIR` overrides [`data_dir`]
//! - `SENTISCOPE_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Saved conversations, CSV exports and text reports land here unless the
/// config names another directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SENTISCOPE_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("sentiscope"))
        .unwrap_or_else(|| PathBuf::from("/tmp/sentiscope-data"))
}

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SENTISCOPE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("sentiscope"))
        .unwrap_or_else(|| PathBuf::from("/tmp/sentiscope-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Saved conversation directory (`data_dir()/conversations/`).
#[must_use]
pub fn conversations_dir() -> PathBuf {
    data_dir().join("conversations")
}
