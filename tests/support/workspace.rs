use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a config file and the store it names.
pub struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    /// Workspace whose config selects `backend` with a file inside the
    /// workspace, plus any `extra` TOML appended verbatim.
    pub fn with_backend(backend: &str, extra: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store_file = match backend {
            "sqlite" => "seen.db",
            _ => "seen.json",
        };
        let store_path = dir.path().join(store_file);
        let config = dir.path().join("config.toml");

        let toml = format!(
            "[logging]\nlevel = \"warn\"\n\n[store]\nbackend = \"{backend}\"\npath = {:?}\n\n{extra}",
            store_path.display().to_string()
        );
        fs::write(&config, toml).expect("write config");

        Self { dir, config }
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }

    pub fn config_toml(&self) -> String {
        fs::read_to_string(&self.config).expect("read config")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the workspace.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }
}

/// Five 300px status cards in an 800px viewport; scrolling to 400 after
/// 300ms pushes card "1" fully out through the top.
pub const SCROLL_PAST_FIRST: &str = r#"{
    "viewport_height": 800,
    "start_ms": 1700000000000,
    "cards": [
        { "id": "1", "height": 300 },
        { "id": "2", "height": 300 },
        { "id": "3", "height": 300 },
        { "id": "4", "height": 300 },
        { "id": "5", "height": 300 }
    ],
    "steps": [
        { "op": "interval" },
        { "op": "advance", "ms": 300 },
        { "op": "scroll", "position": 400 }
    ]
}"#;

/// Reopens a feed containing card "1" a minute later.
pub const REVISIT_FIRST: &str = r#"{
    "viewport_height": 800,
    "start_ms": 1700000060000,
    "cards": [
        { "id": "1", "height": 300 },
        { "id": "2", "height": 300 }
    ],
    "steps": [
        { "op": "interval" },
        { "op": "restore", "id": "1" }
    ]
}"#;
