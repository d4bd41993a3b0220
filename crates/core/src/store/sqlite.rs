// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed Local Store.
//!
//! Records and actions are stored as JSON bodies next to the columns that
//! back their indexes, mirroring a keyed object store. The schema version
//! lives in `PRAGMA user_version`; any mismatch drops every table and starts
//! over, so nothing is carried across versions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Params, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use tracing::info;

use super::LocalStore;
use crate::error::{Error, Result};
use crate::queue::{QueueStatus, QueuedAction};
use crate::record::{CheckInRecord, CompositeKey};

/// Current layout version. Bumping it wipes existing local data.
pub const SCHEMA_VERSION: i64 = 2;

/// SQL schema for the local containers.
pub const SCHEMA: &str = r#"
-- Check-in records keyed by composite key
CREATE TABLE IF NOT EXISTS check_ins (
    booking_group_id TEXT NOT NULL,
    record_locator TEXT NOT NULL,
    flight_number TEXT NOT NULL,
    synced INTEGER NOT NULL DEFAULT 0,
    body TEXT NOT NULL,
    PRIMARY KEY (booking_group_id, record_locator)
);

-- Pending and historical sync actions
CREATE TABLE IF NOT EXISTS sync_queue (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    enqueued_ms INTEGER NOT NULL,
    enqueued_counter INTEGER NOT NULL,
    body TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_check_ins_locator ON check_ins(record_locator);
CREATE INDEX IF NOT EXISTS idx_check_ins_flight ON check_ins(flight_number);
CREATE INDEX IF NOT EXISTS idx_check_ins_synced ON check_ins(synced);
CREATE INDEX IF NOT EXISTS idx_sync_queue_status ON sync_queue(status);
CREATE INDEX IF NOT EXISTS idx_sync_queue_enqueued ON sync_queue(enqueued_ms, enqueued_counter);
"#;

/// Brings a connection to [`SCHEMA_VERSION`].
///
/// A database at any other version (including an unversioned one holding
/// tables) loses every table before the current schema is created.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version == SCHEMA_VERSION {
        conn.execute_batch(SCHEMA)?;
        return Ok(());
    }

    let tx = conn.transaction()?;
    let obsolete: Vec<String> = {
        let mut stmt = tx.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect::<rusqlite::Result<_>>()?
    };
    for table in &obsolete {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\"", table.replace('"', "\"\"")))?;
    }
    if !obsolete.is_empty() {
        info!(from = version, to = SCHEMA_VERSION, dropped = ?obsolete, "local schema reset");
    }

    tx.execute_batch(SCHEMA)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

enum Target {
    File(PathBuf),
    Memory,
}

/// Local Store persisted in a SQLite file.
pub struct SqliteStore {
    target: Target,
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// A store backed by the database file at `path`. Nothing is opened
    /// until [`LocalStore::init`].
    pub fn new(path: &Path) -> Self {
        SqliteStore { target: Target::File(path.to_path_buf()), conn: Mutex::new(None) }
    }

    /// A store backed by a private in-memory database (for testing).
    pub fn in_memory() -> Self {
        SqliteStore { target: Target::Memory, conn: Mutex::new(None) }
    }

    /// Runs `f` inside one read transaction. The transaction rolls back when
    /// it is dropped without a commit, which covers every error path.
    fn with_tx<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        self.run_tx(TransactionBehavior::Deferred, f)
    }

    /// Like [`Self::with_tx`], but takes the write lock up front so a
    /// read-compare-write cannot interleave with another connection's write.
    fn with_write_tx<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        self.run_tx(TransactionBehavior::Immediate, f)
    }

    fn run_tx<T>(
        &self,
        behavior: TransactionBehavior,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let conn = guard.as_mut().ok_or(Error::NotInitialized)?;
        let tx = conn.transaction_with_behavior(behavior)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn query_bodies<T: DeserializeOwned, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let bodies = stmt
        .query_map(params, |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    bodies.iter().map(|body| serde_json::from_str(body).map_err(Error::from)).collect()
}

fn write_record(conn: &Connection, record: &CheckInRecord) -> Result<()> {
    let body = serde_json::to_string(record)?;
    conn.execute(
        "INSERT OR REPLACE INTO check_ins
         (booking_group_id, record_locator, flight_number, synced, body)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.booking_group_id,
            record.record_locator,
            record.flight_number,
            record.synced,
            body,
        ],
    )?;
    Ok(())
}

fn read_record(conn: &Connection, key: &CompositeKey) -> Result<Option<CheckInRecord>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM check_ins WHERE booking_group_id = ?1 AND record_locator = ?2",
            params![key.booking_group_id, key.record_locator],
            |row| row.get(0),
        )
        .optional()?;
    body.map(|b| serde_json::from_str(&b).map_err(Error::from)).transpose()
}

fn stored_status(conn: &Connection, id: &str) -> Result<Option<QueueStatus>> {
    let status: Option<String> = conn
        .query_row("SELECT status FROM sync_queue WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    status.map(|s| s.parse()).transpose()
}

fn terminal(id: &str, status: QueueStatus) -> Error {
    Error::TerminalAction { id: id.to_string(), status: status.to_string() }
}

/// Inserts the action, or updates it while the stored copy is still pending.
fn write_action(conn: &Connection, action: &QueuedAction) -> Result<()> {
    let body = serde_json::to_string(action)?;
    let stamp = action.enqueued_at();
    let wall_ms = i64::try_from(stamp.wall_ms).map_err(|_| {
        Error::CorruptedData(format!("enqueue time {} out of range", stamp.wall_ms))
    })?;
    let written = conn.execute(
        "INSERT INTO sync_queue (id, status, enqueued_ms, enqueued_counter, body)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET status = excluded.status, body = excluded.body
         WHERE sync_queue.status = ?6",
        params![
            action.id(),
            action.status().as_str(),
            wall_ms,
            stamp.counter,
            body,
            QueueStatus::Pending.as_str(),
        ],
    )?;
    if written == 0 {
        let status = stored_status(conn, action.id())?.unwrap_or(action.status());
        return Err(terminal(action.id(), status));
    }
    Ok(())
}

/// Updates an existing pending action. Returns `false` when the action is
/// gone from the queue.
fn settle(conn: &Connection, action: &QueuedAction) -> Result<bool> {
    let body = serde_json::to_string(action)?;
    let updated = conn.execute(
        "UPDATE sync_queue SET status = ?2, body = ?3 WHERE id = ?1 AND status = ?4",
        params![action.id(), action.status().as_str(), body, QueueStatus::Pending.as_str()],
    )?;
    if updated == 1 {
        return Ok(true);
    }
    match stored_status(conn, action.id())? {
        Some(status) => Err(terminal(action.id(), status)),
        None => Ok(false),
    }
}

impl LocalStore for SqliteStore {
    fn init(&self) -> Result<()> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return Ok(());
        }

        let mut conn = match &self.target {
            Target::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let conn = Connection::open(path)?;
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA busy_timeout = 5000;",
                )?;
                conn
            }
            Target::Memory => Connection::open_in_memory()?,
        };

        migrate(&mut conn)?;
        *guard = Some(conn);
        Ok(())
    }

    fn get_by_key(&self, key: &CompositeKey) -> Result<Option<CheckInRecord>> {
        self.with_tx(|tx| read_record(tx, key))
    }

    fn get_all_by_locator(&self, record_locator: &str) -> Result<Vec<CheckInRecord>> {
        self.with_tx(|tx| {
            query_bodies(
                tx,
                "SELECT body FROM check_ins WHERE record_locator = ?1 ORDER BY booking_group_id",
                params![record_locator],
            )
        })
    }

    fn get_all(&self) -> Result<Vec<CheckInRecord>> {
        self.with_tx(|tx| {
            query_bodies(
                tx,
                "SELECT body FROM check_ins ORDER BY booking_group_id, record_locator",
                [],
            )
        })
    }

    fn upsert(&self, record: &CheckInRecord) -> Result<()> {
        self.with_write_tx(|tx| write_record(tx, record))
    }

    fn put_queue_entry(&self, action: &QueuedAction) -> Result<()> {
        self.with_write_tx(|tx| write_action(tx, action))
    }

    fn record_mutation(&self, record: &CheckInRecord, action: &QueuedAction) -> Result<()> {
        self.with_write_tx(|tx| {
            write_record(tx, record)?;
            write_action(tx, action)
        })
    }

    fn replace_record(
        &self,
        expected: &CheckInRecord,
        record: &CheckInRecord,
        action: &QueuedAction,
    ) -> Result<bool> {
        self.with_write_tx(|tx| {
            if read_record(tx, &expected.key())?.as_ref() != Some(expected) {
                return Ok(false);
            }
            write_record(tx, record)?;
            write_action(tx, action)?;
            Ok(true)
        })
    }

    fn settle_action(&self, action: &QueuedAction) -> Result<bool> {
        self.with_write_tx(|tx| settle(tx, action))
    }

    fn commit_synced(&self, action: &QueuedAction) -> Result<bool> {
        self.with_write_tx(|tx| {
            if !settle(tx, action)? {
                return Ok(false);
            }
            let payload = action.payload();
            match read_record(tx, &payload.key())? {
                Some(current) if !current.same_snapshot(payload) => Ok(false),
                current => {
                    let mut record = current.unwrap_or_else(|| payload.clone());
                    record.synced = true;
                    write_record(tx, &record)?;
                    Ok(true)
                }
            }
        })
    }

    fn list_queue(&self) -> Result<Vec<QueuedAction>> {
        self.with_tx(|tx| {
            query_bodies(
                tx,
                "SELECT body FROM sync_queue ORDER BY enqueued_ms, enqueued_counter, id",
                [],
            )
        })
    }

    fn list_pending(&self) -> Result<Vec<QueuedAction>> {
        self.with_tx(|tx| {
            query_bodies(
                tx,
                "SELECT body FROM sync_queue WHERE status = ?1
                 ORDER BY enqueued_ms, enqueued_counter, id",
                params![QueueStatus::Pending.as_str()],
            )
        })
    }

    fn delete_queue_entry(&self, id: &str) -> Result<()> {
        self.with_write_tx(|tx| {
            tx.execute("DELETE FROM sync_queue WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    fn clear_all(&self) -> Result<()> {
        self.with_write_tx(|tx| {
            tx.execute_batch("DELETE FROM check_ins; DELETE FROM sync_queue;")?;
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
