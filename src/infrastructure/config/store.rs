//! Seen store selection.

use std::path::PathBuf;

use serde::Deserialize;

/// Persistence backend for seen records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Volatile; nothing survives the process.
    Memory,
    /// Single JSON array file.
    Json,
    /// SQLite database via Diesel.
    #[default]
    Sqlite,
}

impl StoreBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    /// File name used under the data directory when no path is configured.
    #[must_use]
    pub const fn default_file_name(self) -> Option<&'static str> {
        match self {
            Self::Memory => None,
            Self::Json => Some("seen.json"),
            Self::Sqlite => Some("xdedupe.db"),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Backend to persist seen records in. Defaults to sqlite.
    #[serde(default)]
    pub backend: StoreBackend,

    /// File backing the store.
    ///
    /// Defaults to a backend-specific file under `~/.xdedupe/`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Hand writes to a background task instead of blocking the engine.
    #[serde(default)]
    pub write_behind: bool,
}

/// Returns the xdedupe data directory (`~/.xdedupe/`).
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".xdedupe")
}

impl StoreConfig {
    /// Effective file path, if the backend uses one.
    #[must_use]
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let file_name = self.backend.default_file_name()?;
        Some(
            self.path
                .clone()
                .unwrap_or_else(|| data_dir().join(file_name)),
        )
    }
}
