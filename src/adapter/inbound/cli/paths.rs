//! Path utilities for xdedupe.
//!
//! All data lives under `~/.xdedupe/`:
//! - `~/.xdedupe/config.toml` - main configuration
//! - `~/.xdedupe/xdedupe.db` - seen store (sqlite backend)
//! - `~/.xdedupe/seen.json` - seen store (json backend)

use std::path::PathBuf;

/// Returns the xdedupe home directory (`~/.xdedupe/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".xdedupe")
}

/// Returns the default config file path (`~/.xdedupe/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
