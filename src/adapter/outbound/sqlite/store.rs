//! SQLite seen store implementation.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use tracing::warn;

use super::connection::DbPool;
use super::model::SeenItemRow;
use super::schema::seen_items;
use crate::domain::id::ItemId;
use crate::domain::seen::{from_epoch_millis, to_epoch_millis, SeenRecord};
use crate::error::StoreError;
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

/// Ids per `DELETE ... IN (...)`; SQLite caps bound variables per statement.
const DELETE_CHUNK: usize = 500;

type SqliteConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed seen store.
///
/// Rows live in `seen_items(id, expires_at)` with expiry in epoch
/// milliseconds.
pub struct SqliteSeenStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteSeenStore {
    /// Create a new SQLite seen store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(&self) -> Result<SqliteConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn to_row(record: &SeenRecord) -> SeenItemRow {
        SeenItemRow {
            id: record.id.as_str().to_string(),
            expires_at: to_epoch_millis(record.expires_at),
        }
    }
}

impl SeenStore for SqliteSeenStore {
    fn scan(
        &self,
        visit: &mut dyn FnMut(&SeenRecord) -> Visit,
    ) -> Result<ScanSummary, StoreError> {
        let mut conn = self.connection()?;
        let rows: Vec<SeenItemRow> = seen_items::table
            .select(SeenItemRow::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut summary = ScanSummary::default();
        let mut doomed = Vec::new();
        for row in rows {
            let Some(expires_at) = from_epoch_millis(row.expires_at) else {
                warn!(
                    id = %row.id,
                    expires_at = row.expires_at,
                    "Skipping seen row with invalid expiry"
                );
                continue;
            };
            summary.visited += 1;
            let record = SeenRecord {
                id: ItemId::from(row.id),
                expires_at,
            };
            if visit(&record) == Visit::Delete {
                doomed.push(record.id.as_str().to_string());
            }
        }

        if !doomed.is_empty() {
            summary.deleted = conn
                .transaction(|conn| {
                    let mut deleted = 0;
                    for chunk in doomed.chunks(DELETE_CHUNK) {
                        let ids = chunk.iter().map(String::as_str);
                        deleted += diesel::delete(
                            seen_items::table.filter(seen_items::id.eq_any(ids)),
                        )
                        .execute(conn)?;
                    }
                    Ok::<_, diesel::result::Error>(deleted)
                })
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }
        Ok(summary)
    }

    fn upsert(&self, records: &[SeenRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let rows: Vec<SeenItemRow> = records.iter().map(Self::to_row).collect();
        let mut conn = self.connection()?;

        conn.transaction(|conn| {
            for row in &rows {
                diesel::replace_into(seen_items::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(())
        })
        .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(seen_items::table.find(id.as_str()))
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut conn = self.connection()?;
        diesel::delete(seen_items::table)
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
