// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use sd_core::{
    ActionKind, Baggage, CheckInRecord, CompositeKey, LocalStore, MemoryStore, QueuedAction, Stamp,
};
use tokio::sync::Notify;

use super::adapter::{RemoteAdapter, RemoteError, RemoteFuture};

/// A record for flight CX500 HKG→NRT with no bags.
pub fn sample_record(group: &str, locator: &str) -> CheckInRecord {
    CheckInRecord {
        booking_group_id: group.to_string(),
        record_locator: locator.to_string(),
        flight_number: "CX500".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        origin: "HKG".to_string(),
        destination: "NRT".to_string(),
        passenger_name: "Jane Smith".to_string(),
        seat_number: "22A".to_string(),
        baggage: Vec::new(),
        checked_in: false,
        modified_at: Utc.with_ymd_and_hms(2026, 3, 14, 6, 30, 0).unwrap(),
        desk_id: "HKG-F32".to_string(),
        synced: false,
    }
}

/// The same record carrying `count` bags.
pub fn record_with_bags(group: &str, locator: &str, count: usize) -> CheckInRecord {
    let mut record = sample_record(group, locator);
    record.baggage = (0..count)
        .map(|i| Baggage::checked(format!("60012345{i}"), 18.5 + i as f64, "BLACK"))
        .collect();
    record
}

/// Upserts `record` and enqueues a pending action for it stamped at `wall_ms`.
pub fn enqueue(
    store: &dyn LocalStore,
    kind: ActionKind,
    record: &CheckInRecord,
    wall_ms: u64,
) -> QueuedAction {
    let action = QueuedAction::new(kind, record.clone(), Stamp::new(wall_ms, 0));
    store.record_mutation(record, &action).unwrap();
    action
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::initialized())
}

/// Scriptable in-memory remote.
///
/// Outcomes are consumed in call order; once the script runs out every put
/// succeeds. Successful puts land in an in-memory table keyed like the real
/// one.
#[derive(Default)]
pub struct FakeAdapter {
    script: Mutex<VecDeque<Result<(), RemoteError>>>,
    puts: Mutex<Vec<CheckInRecord>>,
    table: Mutex<Vec<CheckInRecord>>,
    gate: Option<Arc<Notify>>,
    entered: Arc<Notify>,
    fail_queries: AtomicBool,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every put waits on `gate` before completing.
    pub fn gated(gate: Arc<Notify>) -> Self {
        FakeAdapter { gate: Some(gate), ..Self::default() }
    }

    pub fn script(&self, outcomes: impl IntoIterator<Item = Result<(), RemoteError>>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    /// Notified each time a put starts.
    pub fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    /// Every record a put was attempted with, in order.
    pub fn puts(&self) -> Vec<CheckInRecord> {
        self.puts.lock().unwrap().clone()
    }

    pub fn remote(&self, key: &CompositeKey) -> Option<CheckInRecord> {
        self.table.lock().unwrap().iter().find(|r| r.key() == *key).cloned()
    }

    pub fn seed(&self, record: CheckInRecord) {
        self.table.lock().unwrap().push(record);
    }
}

impl RemoteAdapter for FakeAdapter {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn put<'a>(&'a self, record: &'a CheckInRecord) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.puts.lock().unwrap().push(record.clone());
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
            if outcome.is_ok() {
                let mut table = self.table.lock().unwrap();
                table.retain(|r| r.key() != record.key());
                let mut stored = record.clone();
                stored.synced = true;
                table.push(stored);
            }
            outcome
        })
    }

    fn query_by_locator<'a>(
        &'a self,
        record_locator: &'a str,
    ) -> RemoteFuture<'a, Vec<CheckInRecord>> {
        Box::pin(async move {
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(RemoteError::Transient("query failed".to_string()));
            }
            Ok(self
                .table
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.record_locator == record_locator)
                .cloned()
                .collect())
        })
    }
}
