//! Behavior every seen store backend must share.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;
use xdedupe::adapter::outbound::blob::JsonBlobStore;
use xdedupe::adapter::outbound::memory::MemoryStore;
use xdedupe::adapter::outbound::sqlite::connection::{create_pool, run_migrations};
use xdedupe::adapter::outbound::sqlite::store::SqliteSeenStore;
use xdedupe::application::cache::seen::{SeenCache, SeenCacheConfig};
use xdedupe::domain::id::ItemId;
use xdedupe::domain::seen::SeenRecord;
use xdedupe::infrastructure::config::store::{StoreBackend, StoreConfig};
use xdedupe::infrastructure::factory::store::{build_store, open_store};
use xdedupe::port::outbound::store::{ScanSummary, SeenStore, Visit};
use xdedupe::testkit::clock::t0;

fn sqlite_store(dir: &Path) -> SqliteSeenStore {
    let pool = create_pool(&dir.join("seen.db").to_string_lossy()).expect("create pool");
    run_migrations(&pool).expect("run migrations");
    SqliteSeenStore::new(pool)
}

/// One instance of each backend, the file-backed ones inside `dir`.
fn backends(dir: &TempDir) -> Vec<Arc<dyn SeenStore>> {
    vec![
        Arc::new(MemoryStore::new()),
        Arc::new(JsonBlobStore::new(dir.path().join("seen.json"))),
        Arc::new(sqlite_store(dir.path())),
    ]
}

fn record(id: &str, at: DateTime<Utc>, days: i64) -> SeenRecord {
    SeenRecord::new(ItemId::from(id), at, Duration::days(days))
}

fn contents(store: &dyn SeenStore) -> Vec<(String, DateTime<Utc>)> {
    let mut rows = Vec::new();
    store
        .scan(&mut |r| {
            rows.push((r.id.as_str().to_string(), r.expires_at));
            Visit::Keep
        })
        .expect("scan");
    rows.sort();
    rows
}

#[test]
fn upsert_is_last_writer_wins_per_id() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        store.upsert(&[record("a", t0(), 1), record("b", t0(), 1)]).unwrap();
        store.upsert(&[record("a", t0(), 5)]).unwrap();

        assert_eq!(
            contents(store.as_ref()),
            vec![
                ("a".to_string(), t0() + Duration::days(5)),
                ("b".to_string(), t0() + Duration::days(1)),
            ],
            "{}",
            store.backend_name()
        );
    }
}

#[test]
fn scan_deletes_exactly_the_rows_marked() {
    let dir = tempfile::tempdir().unwrap();
    let later = t0() + Duration::days(3);
    for store in backends(&dir) {
        store
            .upsert(&[record("old", t0(), 1), record("new", t0(), 9), record("mid", t0(), 2)])
            .unwrap();

        let summary = store
            .scan(&mut |r| {
                if r.is_expired(later) {
                    Visit::Delete
                } else {
                    Visit::Keep
                }
            })
            .unwrap();

        assert_eq!(summary, ScanSummary { visited: 3, deleted: 2 }, "{}", store.backend_name());
        assert_eq!(contents(store.as_ref()).len(), 1);
    }
}

#[test]
fn remove_and_clear_agree_across_backends() {
    let dir = tempfile::tempdir().unwrap();
    for store in backends(&dir) {
        store.upsert(&[record("a", t0(), 1), record("b", t0(), 1)]).unwrap();

        assert!(store.remove(&ItemId::from("a")).unwrap(), "{}", store.backend_name());
        assert!(!store.remove(&ItemId::from("a")).unwrap());
        assert_eq!(store.clear().unwrap(), 1);
        assert!(contents(store.as_ref()).is_empty());
    }
}

#[test]
fn expiry_survives_millisecond_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let at = t0() + Duration::milliseconds(123);
    for store in backends(&dir) {
        store.upsert(&[record("ms", at, 7)]).unwrap();
        assert_eq!(contents(store.as_ref())[0].1, at + Duration::days(7));
    }
}

#[test]
fn malformed_json_blob_reads_as_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
    let store = JsonBlobStore::new(path.clone());

    assert!(contents(&store).is_empty());
    store.upsert(&[record("a", t0(), 1)]).unwrap();
    assert_eq!(contents(&store).len(), 1);
}

#[test]
fn cache_round_trips_through_each_file_backend() {
    for backend in [StoreBackend::Json, StoreBackend::Sqlite] {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend,
            path: Some(dir.path().join("store")),
            write_behind: false,
        };

        let mut cache = SeenCache::new(open_store(&config).unwrap(), &SeenCacheConfig::default());
        cache.mark_seen(Some(ItemId::from("7")), Duration::days(7), t0());
        assert_eq!(cache.flush(), 1);

        let mut reopened =
            SeenCache::new(open_store(&config).unwrap(), &SeenCacheConfig::default());
        assert_eq!(reopened.load(t0()).kept, 1, "{backend:?}");
        assert!(reopened.has(&ItemId::from("7"), t0()));
    }
}

#[tokio::test]
async fn write_behind_store_persists_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        path: Some(dir.path().join("seen.db")),
        write_behind: true,
    };

    let handle = build_store(&config).unwrap();
    let mut cache = SeenCache::new(handle.store(), &SeenCacheConfig::default());
    for i in 0..25 {
        cache.mark_seen(Some(ItemId::new(i.to_string())), Duration::days(7), t0());
    }
    cache.flush();
    handle.close().await;

    let direct = open_store(&StoreConfig {
        write_behind: false,
        ..config
    })
    .unwrap();
    assert_eq!(contents(direct.as_ref()).len(), 25);
}
