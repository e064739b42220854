//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::seen_items;

/// Database row for a seen record. Expiry is in epoch milliseconds.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = seen_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SeenItemRow {
    pub id: String,
    pub expires_at: i64,
}
