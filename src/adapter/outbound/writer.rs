//! Fire-and-forget persistence wrapper.
//!
//! [`WriteBehindStore`] hands upsert batches to a background tokio task over
//! an unbounded channel; the task performs the blocking write on the
//! blocking pool and logs failures. Reads and maintenance calls go straight
//! to the wrapped store, so a scan may not yet observe queued writes.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::id::ItemId;
use crate::domain::seen::SeenRecord;
use crate::error::StoreError;
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

pub struct WriteBehindStore {
    inner: Arc<dyn SeenStore>,
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<SeenRecord>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WriteBehindStore {
    /// Wrap `inner` and spawn the writer task on the current runtime.
    ///
    /// # Errors
    /// Returns [`StoreError::Connection`] when called outside a tokio runtime.
    pub fn spawn(inner: Arc<dyn SeenStore>) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            StoreError::Connection(format!("write-behind needs a tokio runtime: {e}"))
        })?;
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<SeenRecord>>();

        let writer = Arc::clone(&inner);
        let worker = runtime.spawn(async move {
            while let Some(batch) = rx.recv().await {
                let store = Arc::clone(&writer);
                let count = batch.len();
                match tokio::task::spawn_blocking(move || store.upsert(&batch)).await {
                    Ok(Ok(())) => {
                        debug!(backend = writer.backend_name(), count, "Wrote seen batch");
                    }
                    Ok(Err(e)) => warn!(
                        backend = writer.backend_name(),
                        count,
                        error = %e,
                        "Background seen write failed"
                    ),
                    Err(e) => error!(error = %e, "Background seen writer panicked"),
                }
            }
        });

        Ok(Self {
            inner,
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Stop accepting writes and wait until every queued batch is written.
    pub async fn close(&self) {
        self.tx.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                error!(error = %e, "Seen writer task failed");
            }
        }
    }
}

impl SeenStore for WriteBehindStore {
    fn scan(
        &self,
        visit: &mut dyn FnMut(&SeenRecord) -> Visit,
    ) -> Result<ScanSummary, StoreError> {
        self.inner.scan(visit)
    }

    fn upsert(&self, records: &[SeenRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(StoreError::Closed)?;
        tx.send(records.to_vec()).map_err(|_| StoreError::Closed)
    }

    fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        self.inner.remove(id)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        self.inner.clear()
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::testkit::store::FailingStore;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn close_drains_queued_batches() {
        let inner = Arc::new(MemoryStore::new());
        let store = WriteBehindStore::spawn(inner.clone()).unwrap();

        for i in 0..5 {
            let record = SeenRecord::new(ItemId::new(format!("{i}")), t0(), Duration::days(7));
            store.upsert(&[record]).unwrap();
        }
        store.close().await;

        assert_eq!(inner.len(), 5);
    }

    #[tokio::test]
    async fn upsert_after_close_reports_closed() {
        let store = WriteBehindStore::spawn(Arc::new(MemoryStore::new())).unwrap();
        store.close().await;

        let record = SeenRecord::new(ItemId::from("late"), t0(), Duration::days(7));
        assert!(matches!(store.upsert(&[record]), Err(StoreError::Closed)));
    }

    #[tokio::test]
    async fn background_failures_do_not_reach_the_caller() {
        let store = WriteBehindStore::spawn(Arc::new(FailingStore)).unwrap();
        let record = SeenRecord::new(ItemId::from("1"), t0(), Duration::days(7));

        assert!(store.upsert(&[record]).is_ok());
        store.close().await;
    }

    #[test]
    fn spawn_outside_runtime_is_an_error() {
        assert!(WriteBehindStore::spawn(Arc::new(MemoryStore::new())).is_err());
    }
}
