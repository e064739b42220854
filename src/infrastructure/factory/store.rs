//! Seen store factory.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::outbound::blob::JsonBlobStore;
use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::sqlite::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::store::SqliteSeenStore;
use crate::adapter::outbound::writer::WriteBehindStore;
use crate::error::{ConfigError, Result, StoreError};
use crate::infrastructure::config::store::{StoreBackend, StoreConfig};
use crate::port::outbound::store::SeenStore;

/// A built store plus the background writer wrapping it, if any.
pub struct StoreHandle {
    store: Arc<dyn SeenStore>,
    writer: Option<Arc<WriteBehindStore>>,
}

impl StoreHandle {
    /// Store to hand to the engine.
    #[must_use]
    pub fn store(&self) -> Arc<dyn SeenStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Drain queued background writes, if the store has a writer.
    pub async fn close(self) {
        if let Some(writer) = self.writer {
            writer.close().await;
        }
    }
}

/// Open the configured backend for direct, synchronous use.
///
/// File-backed stores create their parent directory on demand.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn SeenStore>> {
    let store: Arc<dyn SeenStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Json => Arc::new(JsonBlobStore::new(resolved_path(config)?)),
        StoreBackend::Sqlite => {
            let path = resolved_path(config)?;
            ensure_parent(&path)?;
            let pool = create_pool(&path.to_string_lossy())?;
            run_migrations(&pool)?;
            Arc::new(SqliteSeenStore::new(pool))
        }
    };
    debug!(backend = store.backend_name(), "Opened seen store");
    Ok(store)
}

/// Open the configured backend, wrapped in a write-behind writer when
/// `write_behind` is set.
///
/// The writer needs the current tokio runtime.
pub fn build_store(config: &StoreConfig) -> Result<StoreHandle> {
    let store = open_store(config)?;
    if !config.write_behind {
        return Ok(StoreHandle {
            store,
            writer: None,
        });
    }

    let writer = Arc::new(WriteBehindStore::spawn(store)?);
    info!(backend = writer.backend_name(), "Seen writes go through the background writer");
    Ok(StoreHandle {
        store: writer.clone(),
        writer: Some(writer),
    })
}

fn resolved_path(config: &StoreConfig) -> Result<std::path::PathBuf> {
    config.resolved_path().ok_or_else(|| {
        ConfigError::MissingField {
            field: "store.path",
        }
        .into()
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
    }
    Ok(())
}
