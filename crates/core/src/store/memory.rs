// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory Local Store.
//!
//! Holds the same two containers as the SQLite store inside one mutex. Each
//! method takes the lock for its whole duration, which gives it the same
//! all-or-nothing scope as a SQLite transaction.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::LocalStore;
use crate::error::{Error, Result};
use crate::queue::{QueueStatus, QueuedAction};
use crate::record::{CheckInRecord, CompositeKey};

#[derive(Default)]
struct Containers {
    check_ins: BTreeMap<CompositeKey, CheckInRecord>,
    queue: BTreeMap<String, QueuedAction>,
}

impl Containers {
    fn sorted_queue(&self, filter: impl Fn(&QueuedAction) -> bool) -> Vec<QueuedAction> {
        let mut actions: Vec<QueuedAction> =
            self.queue.values().filter(|a| filter(a)).cloned().collect();
        actions.sort_by(|a, b| {
            a.enqueued_at().cmp(&b.enqueued_at()).then_with(|| a.id().cmp(b.id()))
        });
        actions
    }

    /// Stored status of a settled action, if the id names one.
    fn settled(&self, id: &str) -> Option<QueueStatus> {
        self.queue.get(id).map(QueuedAction::status).filter(QueueStatus::is_terminal)
    }

    fn write_action(&mut self, action: &QueuedAction) -> Result<()> {
        if let Some(status) = self.settled(action.id()) {
            return Err(terminal(action.id(), status));
        }
        self.queue.insert(action.id().to_string(), action.clone());
        Ok(())
    }

    fn settle(&mut self, action: &QueuedAction) -> Result<bool> {
        if let Some(status) = self.settled(action.id()) {
            return Err(terminal(action.id(), status));
        }
        match self.queue.get_mut(action.id()) {
            Some(stored) => {
                *stored = action.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn terminal(id: &str, status: QueueStatus) -> Error {
    Error::TerminalAction { id: id.to_string(), status: status.to_string() }
}

/// Local Store kept in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<Containers>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that has already been initialized.
    pub fn initialized() -> Self {
        MemoryStore { inner: Mutex::new(Some(Containers::default())) }
    }

    fn with_containers<T>(&self, f: impl FnOnce(&mut Containers) -> T) -> Result<T> {
        let mut guard: MutexGuard<'_, Option<Containers>> =
            self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let containers = guard.as_mut().ok_or(Error::NotInitialized)?;
        Ok(f(containers))
    }
}

impl LocalStore for MemoryStore {
    fn init(&self) -> Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(Containers::default());
        }
        Ok(())
    }

    fn get_by_key(&self, key: &CompositeKey) -> Result<Option<CheckInRecord>> {
        self.with_containers(|c| c.check_ins.get(key).cloned())
    }

    fn get_all_by_locator(&self, record_locator: &str) -> Result<Vec<CheckInRecord>> {
        self.with_containers(|c| {
            c.check_ins.values().filter(|r| r.record_locator == record_locator).cloned().collect()
        })
    }

    fn get_all(&self) -> Result<Vec<CheckInRecord>> {
        self.with_containers(|c| c.check_ins.values().cloned().collect())
    }

    fn upsert(&self, record: &CheckInRecord) -> Result<()> {
        self.with_containers(|c| {
            c.check_ins.insert(record.key(), record.clone());
        })
    }

    fn put_queue_entry(&self, action: &QueuedAction) -> Result<()> {
        self.with_containers(|c| c.write_action(action))?
    }

    fn record_mutation(&self, record: &CheckInRecord, action: &QueuedAction) -> Result<()> {
        self.with_containers(|c| -> Result<()> {
            c.write_action(action)?;
            c.check_ins.insert(record.key(), record.clone());
            Ok(())
        })?
    }

    fn replace_record(
        &self,
        expected: &CheckInRecord,
        record: &CheckInRecord,
        action: &QueuedAction,
    ) -> Result<bool> {
        self.with_containers(|c| -> Result<bool> {
            if c.check_ins.get(&expected.key()) != Some(expected) {
                return Ok(false);
            }
            c.write_action(action)?;
            c.check_ins.insert(record.key(), record.clone());
            Ok(true)
        })?
    }

    fn settle_action(&self, action: &QueuedAction) -> Result<bool> {
        self.with_containers(|c| c.settle(action))?
    }

    fn commit_synced(&self, action: &QueuedAction) -> Result<bool> {
        self.with_containers(|c| -> Result<bool> {
            if !c.settle(action)? {
                return Ok(false);
            }
            let payload = action.payload();
            match c.check_ins.get_mut(&payload.key()) {
                Some(current) if !current.same_snapshot(payload) => Ok(false),
                Some(current) => {
                    current.synced = true;
                    Ok(true)
                }
                None => {
                    let mut record = payload.clone();
                    record.synced = true;
                    c.check_ins.insert(record.key(), record);
                    Ok(true)
                }
            }
        })?
    }

    fn list_queue(&self) -> Result<Vec<QueuedAction>> {
        self.with_containers(|c| c.sorted_queue(|_| true))
    }

    fn list_pending(&self) -> Result<Vec<QueuedAction>> {
        self.with_containers(|c| c.sorted_queue(QueuedAction::is_pending))
    }

    fn delete_queue_entry(&self, id: &str) -> Result<()> {
        self.with_containers(|c| {
            c.queue.remove(id);
        })
    }

    fn clear_all(&self) -> Result<()> {
        self.with_containers(|c| {
            c.check_ins.clear();
            c.queue.clear();
        })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
