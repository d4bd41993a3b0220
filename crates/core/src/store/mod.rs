// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Local Store: durable home of check-in records and the sync queue.
//!
//! Two containers live behind [`LocalStore`]:
//!
//! - `check-ins`, keyed by [`CompositeKey`], indexed by record locator,
//!   flight number and synced flag
//! - `sync-queue`, keyed by action id, indexed by status and enqueue stamp
//!
//! Every method runs in its own transaction and releases it on every exit
//! path. Lookups that find nothing return `None` or an empty list. Calling
//! anything before [`LocalStore::init`] fails with [`Error::NotInitialized`].
//!
//! [`Error::NotInitialized`]: crate::error::Error::NotInitialized

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{migrate, SqliteStore, SCHEMA, SCHEMA_VERSION};

use crate::error::Result;
use crate::queue::{QueueStatus, QueuedAction};
use crate::record::{CheckInRecord, CompositeKey};

/// Keyed storage for records and queued actions.
pub trait LocalStore: Send + Sync {
    /// Opens or creates the containers. Calling it again is a no-op.
    fn init(&self) -> Result<()>;

    fn get_by_key(&self, key: &CompositeKey) -> Result<Option<CheckInRecord>>;

    /// All records sharing a record locator, ordered by booking group.
    fn get_all_by_locator(&self, record_locator: &str) -> Result<Vec<CheckInRecord>>;

    /// All records, ordered by composite key.
    fn get_all(&self) -> Result<Vec<CheckInRecord>>;

    /// Inserts or replaces the record stored under its composite key.
    fn upsert(&self, record: &CheckInRecord) -> Result<()>;

    /// Inserts the action, or overwrites the stored copy while that copy is
    /// still pending. A stored `synced` or `failed` action is never
    /// overwritten: the call fails with [`Error::TerminalAction`].
    ///
    /// [`Error::TerminalAction`]: crate::error::Error::TerminalAction
    fn put_queue_entry(&self, action: &QueuedAction) -> Result<()>;

    /// Upserts the record and enqueues the action in a single transaction.
    fn record_mutation(&self, record: &CheckInRecord, action: &QueuedAction) -> Result<()>;

    /// Compare-and-swap for desk edits: writes `record` and enqueues `action`
    /// only if the stored record still equals `expected`. Returns `false`
    /// and writes nothing when another writer got there first.
    fn replace_record(
        &self,
        expected: &CheckInRecord,
        record: &CheckInRecord,
        action: &QueuedAction,
    ) -> Result<bool>;

    /// Persists a status change of a queued action, but only while the
    /// stored copy is pending. Returns `false` when the action is no longer
    /// queued, and fails with [`Error::TerminalAction`] when the stored copy
    /// already settled.
    ///
    /// [`Error::TerminalAction`]: crate::error::Error::TerminalAction
    fn settle_action(&self, action: &QueuedAction) -> Result<bool>;

    /// Settles a delivered action and, in the same transaction, marks the
    /// local record synced when it still holds the delivered snapshot (or
    /// restores it when it is missing). Returns whether the record was
    /// marked. Settling follows [`LocalStore::settle_action`].
    fn commit_synced(&self, action: &QueuedAction) -> Result<bool>;

    /// Every action in ascending enqueue order.
    fn list_queue(&self) -> Result<Vec<QueuedAction>>;

    /// Pending actions in ascending enqueue order.
    fn list_pending(&self) -> Result<Vec<QueuedAction>>;

    /// Removes an action. Removing an unknown id is not an error.
    fn delete_queue_entry(&self, id: &str) -> Result<()>;

    /// Empties both containers.
    fn clear_all(&self) -> Result<()>;

    /// Deletes every `synced` action and returns how many went.
    fn purge_synced(&self) -> Result<usize> {
        let mut purged = 0;
        for action in self.list_queue()? {
            if action.status() == QueueStatus::Synced {
                self.delete_queue_entry(action.id())?;
                purged += 1;
            }
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod conformance;
