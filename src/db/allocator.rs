// Identity allocator - next unused surrogate id for a table.
use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Next unused id for `table`: MAX(id)+1, or 1 for an empty table.
///
/// Only meaningful while the caller holds the store lock and runs the
/// subsequent insert in the same transaction; see the writer layer.
pub(crate) fn next_id(conn: &Connection, table: &'static str) -> Result<i64> {
    let max: Option<i64> = conn
        .query_row(&format!("SELECT MAX(id) FROM {table}"), [], |row| {
            row.get(0)
        })
        .map_err(StoreError::store(table))?;
    Ok(max.unwrap_or(0) + 1)
}
