// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU32, Ordering};

use sd_core::{ManualClock, MemoryStore, Stamp};

use super::*;
use crate::sync::test_helpers::{record_with_bags, sample_record, FakeAdapter};

const T0: u64 = 1_773_469_800_000;

fn desk() -> (DeskService<Arc<ManualClock>>, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::initialized());
    let clock = Arc::new(ManualClock::new(T0));
    let desk = DeskService::with_clock(store.clone(), "HKG-F40", Arc::clone(&clock)).unwrap();
    (desk, store, clock)
}

#[test]
fn test_generate_tag_is_nine_digits() {
    let record = sample_record("G1", "ABC123");
    for _ in 0..50 {
        let tag = generate_tag(&record);
        assert_eq!(tag.len(), 9);
        assert!(tag.chars().all(|c| c.is_ascii_digit()));
        assert!(!tag.starts_with('0'));
    }
}

#[test]
fn test_check_in_updates_record_and_queues_snapshot() {
    let (desk, store, _) = desk();
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();

    let action = desk.check_in(&record.key(), Some("14c")).unwrap();

    let local = store.get_by_key(&record.key()).unwrap().unwrap();
    assert!(local.checked_in);
    assert_eq!(local.seat_number, "14C");
    assert_eq!(local.desk_id, "HKG-F40");
    assert_eq!(local.modified_at, Stamp::new(T0, 0).to_datetime());
    assert!(!local.synced);

    assert_eq!(action.kind(), ActionKind::CheckIn);
    assert_eq!(action.payload(), &local);
    assert_eq!(action.id(), format!("check-in-{T0}-0-G1/ABC123"));
    assert_eq!(store.list_pending().unwrap(), vec![action]);
}

#[test]
fn test_mutation_clears_synced_flag() {
    let (desk, store, _) = desk();
    let mut record = sample_record("G1", "ABC123");
    record.synced = true;
    store.upsert(&record).unwrap();

    desk.check_in(&record.key(), None).unwrap();
    assert!(!store.get_by_key(&record.key()).unwrap().unwrap().synced);
}

#[test]
fn test_same_millisecond_mutations_get_distinct_ids() {
    let (desk, store, _) = desk();
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();

    let first = desk.add_baggage(&record.key(), 20.0, "red").unwrap().1;
    let second = desk.add_baggage(&record.key(), 12.5, "blue").unwrap().1;

    assert_ne!(first.id(), second.id());
    assert!(first.enqueued_at() < second.enqueued_at());
    let pending = store.list_pending().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].payload().baggage.len(), 1);
    assert_eq!(pending[1].payload().baggage.len(), 2);
}

#[test]
fn test_add_baggage_tags_checked_bag() {
    let (desk, store, _) = desk();
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();

    let (bag, action) = desk.add_baggage(&record.key(), 23.4, " black ").unwrap();

    assert_eq!(bag.status, BaggageStatus::Checked);
    assert_eq!(bag.color, "BLACK");
    assert_eq!(bag.weight, 23.4);
    assert_eq!(action.kind(), ActionKind::BaggageAdd);
    assert!(action.payload().has_tag(&bag.tag_number));
}

#[test]
fn test_add_baggage_rejects_bad_weight() {
    let (desk, store, _) = desk();
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();

    for weight in [0.0, -3.0, f64::NAN] {
        let err = desk.add_baggage(&record.key(), weight, "red").unwrap_err();
        assert!(matches!(err, Error::Core(sd_core::Error::Validation(_))));
    }
    assert!(store.list_queue().unwrap().is_empty());
}

#[test]
fn test_remove_baggage_queues_update() {
    let (desk, store, _) = desk();
    let record = record_with_bags("G1", "ABC123", 2);
    store.upsert(&record).unwrap();

    let action = desk.remove_baggage(&record.key(), "600123450").unwrap();

    assert_eq!(action.kind(), ActionKind::Update);
    let tags: Vec<&str> = action.payload().baggage.iter().map(|b| b.tag_number.as_str()).collect();
    assert_eq!(tags, vec!["600123451"]);
}

#[test]
fn test_remove_unknown_bag_changes_nothing() {
    let (desk, store, _) = desk();
    let record = record_with_bags("G1", "ABC123", 1);
    store.upsert(&record).unwrap();

    let err = desk.remove_baggage(&record.key(), "999999999").unwrap_err();
    assert!(matches!(err, Error::BagNotFound { .. }));
    assert!(store.list_queue().unwrap().is_empty());
    assert_eq!(store.get_by_key(&record.key()).unwrap(), Some(record));
}

#[test]
fn test_bag_status_only_moves_from_checked() {
    let (desk, store, _) = desk();
    let record = record_with_bags("G1", "ABC123", 1);
    store.upsert(&record).unwrap();

    desk.set_bag_status(&record.key(), "600123450", BaggageStatus::Loaded).unwrap();
    let err = desk
        .set_bag_status(&record.key(), "600123450", BaggageStatus::Offloaded)
        .unwrap_err();

    assert!(matches!(err, Error::Core(sd_core::Error::Validation(_))));
    let local = store.get_by_key(&record.key()).unwrap().unwrap();
    assert_eq!(local.baggage[0].status, BaggageStatus::Loaded);
    assert_eq!(store.list_queue().unwrap().len(), 1);
}

#[test]
fn test_mutating_unknown_record_fails() {
    let (desk, _, _) = desk();
    let err = desk.check_in(&CompositeKey::new("G1", "NOPE00"), None).unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(_)));
}

#[test]
fn test_resolve_by_locator_and_group() {
    let (desk, store, _) = desk();
    store.upsert(&sample_record("G1", "ABC123")).unwrap();
    store.upsert(&sample_record("G2", "ABC123")).unwrap();
    store.upsert(&sample_record("G3", "XYZ789")).unwrap();

    assert_eq!(desk.resolve("xyz789", None).unwrap().booking_group_id, "G3");
    assert_eq!(desk.resolve("abc123", Some("G2")).unwrap().booking_group_id, "G2");
    assert!(matches!(
        desk.resolve("ABC123", None).unwrap_err(),
        Error::AmbiguousLocator { groups, .. } if groups == vec!["G1", "G2"]
    ));
    assert!(matches!(desk.resolve("NOPE00", None).unwrap_err(), Error::RecordNotFound(_)));
}

#[test]
fn test_clock_resumes_after_queued_actions() {
    let store = Arc::new(MemoryStore::initialized());
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();
    let later = QueuedAction::new(ActionKind::CheckIn, record.clone(), Stamp::new(T0 + 60_000, 4));
    store.put_queue_entry(&later).unwrap();

    // The wall clock is behind the newest queued stamp.
    let desk = DeskService::with_clock(store.clone(), "HKG-F32", ManualClock::new(T0)).unwrap();
    let action = desk.check_in(&record.key(), None).unwrap();

    assert_eq!(action.enqueued_at(), Stamp::new(T0 + 60_000, 5));
    assert_eq!(store.list_pending().unwrap().last().unwrap().id(), action.id());
}

#[tokio::test]
async fn test_lookup_prefers_local_records() {
    let (desk, store, _) = desk();
    let record = sample_record("G1", "ABC123");
    store.upsert(&record).unwrap();
    let adapter = FakeAdapter::new();
    adapter.fail_queries();

    let found = desk.lookup("abc123", Some(&adapter as &dyn RemoteAdapter)).await.unwrap();
    assert_eq!(found.source, LookupSource::Local);
    assert_eq!(found.records, vec![record]);
}

#[tokio::test]
async fn test_lookup_caches_remote_records() {
    let (desk, store, _) = desk();
    let adapter = FakeAdapter::new();
    adapter.seed(record_with_bags("G1", "ABC123", 2));

    let found = desk.lookup("ABC123", Some(&adapter as &dyn RemoteAdapter)).await.unwrap();

    assert_eq!(found.source, LookupSource::Remote);
    assert_eq!(found.records.len(), 1);
    let cached = store.get_by_key(&CompositeKey::new("G1", "ABC123")).unwrap().unwrap();
    assert!(cached.synced);
    assert_eq!(cached.baggage.len(), 2);
    assert!(store.list_queue().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_without_remote_or_with_failing_remote() {
    let (desk, _, _) = desk();
    let found = desk.lookup("ABC123", None).await.unwrap();
    assert_eq!(found.source, LookupSource::NotFound);

    let adapter = FakeAdapter::new();
    adapter.fail_queries();
    let found = desk.lookup("ABC123", Some(&adapter as &dyn RemoteAdapter)).await.unwrap();
    assert!(matches!(found.source, LookupSource::RemoteUnavailable(_)));
    assert!(found.records.is_empty());
}

#[test]
fn test_import_writes_without_queueing() {
    let (desk, store, _) = desk();
    let records = vec![sample_record("G1", "ABC123"), sample_record("G2", "XYZ789")];

    assert_eq!(desk.import(&records).unwrap(), 2);
    assert_eq!(store.get_all().unwrap().len(), 2);
    assert!(store.list_queue().unwrap().is_empty());
}

/// Memory store where another writer edits the record right after each of
/// the next `races` reads.
struct RacingStore {
    inner: MemoryStore,
    races: AtomicU32,
}

impl RacingStore {
    fn new(races: u32) -> Self {
        RacingStore { inner: MemoryStore::initialized(), races: AtomicU32::new(races) }
    }

    fn edit_behind_reader(&self, read: &CheckInRecord, race: u32) {
        let mut other = read.clone();
        other.seat_number = format!("{race}C");
        let action = QueuedAction::new(ActionKind::Update, other.clone(), Stamp::new(1_000, race));
        self.inner.record_mutation(&other, &action).unwrap();
    }
}

impl LocalStore for RacingStore {
    fn init(&self) -> sd_core::Result<()> {
        self.inner.init()
    }
    fn get_by_key(&self, key: &CompositeKey) -> sd_core::Result<Option<CheckInRecord>> {
        let read = self.inner.get_by_key(key)?;
        let left = self.races.load(Ordering::SeqCst);
        if let (Some(record), true) = (&read, left > 0) {
            self.races.store(left - 1, Ordering::SeqCst);
            self.edit_behind_reader(record, left);
        }
        Ok(read)
    }
    fn get_all_by_locator(&self, locator: &str) -> sd_core::Result<Vec<CheckInRecord>> {
        self.inner.get_all_by_locator(locator)
    }
    fn get_all(&self) -> sd_core::Result<Vec<CheckInRecord>> {
        self.inner.get_all()
    }
    fn upsert(&self, record: &CheckInRecord) -> sd_core::Result<()> {
        self.inner.upsert(record)
    }
    fn put_queue_entry(&self, action: &QueuedAction) -> sd_core::Result<()> {
        self.inner.put_queue_entry(action)
    }
    fn record_mutation(&self, record: &CheckInRecord, action: &QueuedAction) -> sd_core::Result<()> {
        self.inner.record_mutation(record, action)
    }
    fn replace_record(
        &self,
        expected: &CheckInRecord,
        record: &CheckInRecord,
        action: &QueuedAction,
    ) -> sd_core::Result<bool> {
        self.inner.replace_record(expected, record, action)
    }
    fn settle_action(&self, action: &QueuedAction) -> sd_core::Result<bool> {
        self.inner.settle_action(action)
    }
    fn commit_synced(&self, action: &QueuedAction) -> sd_core::Result<bool> {
        self.inner.commit_synced(action)
    }
    fn list_queue(&self) -> sd_core::Result<Vec<QueuedAction>> {
        self.inner.list_queue()
    }
    fn list_pending(&self) -> sd_core::Result<Vec<QueuedAction>> {
        self.inner.list_pending()
    }
    fn delete_queue_entry(&self, id: &str) -> sd_core::Result<()> {
        self.inner.delete_queue_entry(id)
    }
    fn clear_all(&self) -> sd_core::Result<()> {
        self.inner.clear_all()
    }
}

fn racing_desk(races: u32) -> (DeskService<Arc<ManualClock>>, Arc<RacingStore>) {
    let store = Arc::new(RacingStore::new(races));
    let desk =
        DeskService::with_clock(store.clone(), "HKG-F40", Arc::new(ManualClock::new(T0))).unwrap();
    (desk, store)
}

#[test]
fn test_concurrent_edit_is_kept_and_mutation_reapplied() {
    let (desk, store) = racing_desk(1);
    let record = sample_record("G1", "ABC123");
    store.inner.upsert(&record).unwrap();

    let (bag, action) = desk.add_baggage(&record.key(), 20.0, "red").unwrap();

    let local = store.get_by_key(&record.key()).unwrap().unwrap();
    assert_eq!(local.seat_number, "1C");
    assert_eq!(local.baggage, vec![bag]);
    assert_eq!(action.payload(), &local);
    // The other writer's action and ours, both pending.
    assert_eq!(store.list_pending().unwrap().len(), 2);
}

#[test]
fn test_record_that_keeps_changing_gives_up() {
    let (desk, store) = racing_desk(MUTATION_ATTEMPTS);
    let record = sample_record("G1", "ABC123");
    store.inner.upsert(&record).unwrap();

    let err = desk.check_in(&record.key(), None).unwrap_err();

    assert!(matches!(err, Error::EditConflict(_)));
    let local = store.get_by_key(&record.key()).unwrap().unwrap();
    assert!(!local.checked_in);
    let kinds: Vec<ActionKind> = store.list_queue().unwrap().iter().map(|a| a.kind()).collect();
    assert_eq!(kinds, vec![ActionKind::Update; MUTATION_ATTEMPTS as usize]);
}
