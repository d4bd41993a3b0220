// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote durable store: one table of check-in records.
//!
//! Partition key is the booking group id, sort key the record locator. A
//! secondary index on the record locator (with the travel date as tiebreak)
//! backs lookups by locator. Both the direct adapter and the gateway server
//! write through this type.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{CheckInRecord, CompositeKey};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS check_in_records (
    pk TEXT NOT NULL,
    sk TEXT NOT NULL,
    travel_date TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (pk, sk)
);

CREATE INDEX IF NOT EXISTS idx_records_locator ON check_in_records(sk, travel_date);
"#;

/// Handle to the remote table.
pub struct RemoteTable {
    conn: Connection,
}

impl RemoteTable {
    /// Opens (creating if needed) the table file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory table (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(RemoteTable { conn })
    }

    /// Writes a record, replacing any item under the same key.
    pub fn put(&self, record: &CheckInRecord) -> Result<()> {
        record.validate()?;
        let body = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO check_in_records (pk, sk, travel_date, body)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.booking_group_id,
                record.record_locator,
                record.date.format("%Y-%m-%d").to_string(),
                body,
            ],
        )?;
        debug!(key = %record.key(), "remote item written");
        Ok(())
    }

    pub fn get(&self, key: &CompositeKey) -> Result<Option<CheckInRecord>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM check_in_records WHERE pk = ?1 AND sk = ?2",
                params![key.booking_group_id, key.record_locator],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|b| serde_json::from_str(&b).map_err(Error::from)).transpose()
    }

    /// Every item with this record locator, ordered by travel date.
    pub fn query_by_locator(&self, record_locator: &str) -> Result<Vec<CheckInRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM check_in_records WHERE sk = ?1 ORDER BY travel_date, pk",
        )?;
        let bodies = stmt
            .query_map(params![record_locator], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        bodies.iter().map(|b| serde_json::from_str(b).map_err(Error::from)).collect()
    }
}

#[cfg(test)]
#[path = "remote_table_tests.rs"]
mod tests;
