// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behaviour every [`LocalStore`] must share. Each backend's test module
//! calls these against a fresh store.

#![allow(clippy::unwrap_used)]

use super::LocalStore;
use crate::error::Error;
use crate::queue::{ActionKind, QueueStatus};
use crate::record::CompositeKey;
use crate::test_support::{pending_action, record_with_bags, sample_record};

pub fn rejects_use_before_init(store: &dyn LocalStore) {
    let key = CompositeKey::new("G1", "ABC123");
    assert!(matches!(store.get_by_key(&key), Err(Error::NotInitialized)));
    assert!(matches!(store.list_pending(), Err(Error::NotInitialized)));
    assert!(matches!(store.upsert(&sample_record("G1", "ABC123")), Err(Error::NotInitialized)));
}

pub fn init_is_idempotent(store: &dyn LocalStore) {
    store.init().unwrap();
    store.upsert(&sample_record("G1", "ABC123")).unwrap();
    store.init().unwrap();
    assert_eq!(store.get_all().unwrap().len(), 1);
}

pub fn missing_lookups_are_empty(store: &dyn LocalStore) {
    store.init().unwrap();
    assert!(store.get_by_key(&CompositeKey::new("G1", "NOPE00")).unwrap().is_none());
    assert!(store.get_all_by_locator("NOPE00").unwrap().is_empty());
    assert!(store.get_all().unwrap().is_empty());
    assert!(store.list_queue().unwrap().is_empty());
}

pub fn upsert_replaces_by_key(store: &dyn LocalStore) {
    store.init().unwrap();
    let mut record = record_with_bags("G1", "ABC123", 2);
    store.upsert(&record).unwrap();
    store.upsert(&record).unwrap();

    record.seat_number = "14C".to_string();
    store.upsert(&record).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], record);
    assert_eq!(store.get_by_key(&record.key()).unwrap(), Some(record));
}

pub fn locator_lookup_spans_groups(store: &dyn LocalStore) {
    store.init().unwrap();
    store.upsert(&sample_record("G2", "ABC123")).unwrap();
    store.upsert(&sample_record("G1", "ABC123")).unwrap();
    store.upsert(&sample_record("G1", "XYZ789")).unwrap();

    let found = store.get_all_by_locator("ABC123").unwrap();
    let groups: Vec<&str> = found.iter().map(|r| r.booking_group_id.as_str()).collect();
    assert_eq!(groups, vec!["G1", "G2"]);
}

pub fn pending_in_enqueue_order(store: &dyn LocalStore) {
    store.init().unwrap();
    let record = sample_record("G1", "ABC123");
    let third = pending_action(ActionKind::Update, &record, 3_000);
    let first = pending_action(ActionKind::CheckIn, &record, 1_000);
    let second = pending_action(ActionKind::BaggageAdd, &record, 2_000);
    for action in [&third, &first, &second] {
        store.put_queue_entry(action).unwrap();
    }

    let mut done = pending_action(ActionKind::Update, &record, 500);
    done.mark_synced().unwrap();
    store.put_queue_entry(&done).unwrap();

    let pending: Vec<String> =
        store.list_pending().unwrap().iter().map(|a| a.id().to_string()).collect();
    assert_eq!(pending, vec![first.id(), second.id(), third.id()]);
    assert_eq!(store.list_queue().unwrap().len(), 4);
    assert_eq!(store.list_queue().unwrap()[0].id(), done.id());
}

pub fn queue_entry_status_persists(store: &dyn LocalStore) {
    store.init().unwrap();
    let mut action = pending_action(ActionKind::CheckIn, &sample_record("G1", "ABC123"), 1_000);
    store.put_queue_entry(&action).unwrap();

    action.record_failure("timeout", true, 3).unwrap();
    store.put_queue_entry(&action).unwrap();

    let stored = store.list_queue().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].retry_count(), 1);
    assert_eq!(stored[0].error_message(), Some("timeout"));
    assert_eq!(stored[0].status(), QueueStatus::Pending);
}

pub fn record_mutation_writes_both(store: &dyn LocalStore) {
    store.init().unwrap();
    let record = record_with_bags("G1", "ABC123", 1);
    let action = pending_action(ActionKind::BaggageAdd, &record, 1_000);
    store.record_mutation(&record, &action).unwrap();

    assert_eq!(store.get_by_key(&record.key()).unwrap(), Some(record));
    assert_eq!(store.list_pending().unwrap(), vec![action]);
}

pub fn delete_and_purge(store: &dyn LocalStore) {
    store.init().unwrap();
    let record = sample_record("G1", "ABC123");
    let keep = pending_action(ActionKind::CheckIn, &record, 1_000);
    let mut gone = pending_action(ActionKind::Update, &record, 2_000);
    gone.mark_synced().unwrap();
    store.put_queue_entry(&keep).unwrap();
    store.put_queue_entry(&gone).unwrap();

    store.delete_queue_entry("no-such-action").unwrap();
    assert_eq!(store.purge_synced().unwrap(), 1);
    assert_eq!(store.list_queue().unwrap(), vec![keep.clone()]);

    store.delete_queue_entry(keep.id()).unwrap();
    assert!(store.list_queue().unwrap().is_empty());
}

pub fn clear_all_empties_everything(store: &dyn LocalStore) {
    store.init().unwrap();
    let record = sample_record("G1", "ABC123");
    store
        .record_mutation(&record, &pending_action(ActionKind::CheckIn, &record, 1_000))
        .unwrap();

    store.clear_all().unwrap();
    assert!(store.get_all().unwrap().is_empty());
    assert!(store.list_queue().unwrap().is_empty());
}

pub fn settled_action_is_frozen(store: &dyn LocalStore) {
    store.init().unwrap();
    let pending = pending_action(ActionKind::CheckIn, &sample_record("G1", "ABC123"), 1_000);
    store.put_queue_entry(&pending).unwrap();

    let mut synced = pending.clone();
    synced.mark_synced().unwrap();
    assert!(store.settle_action(&synced).unwrap());

    // A second writer still holding the pending copy loses.
    let mut retried = pending.clone();
    retried.record_failure("timeout", true, 3).unwrap();
    let err = store.settle_action(&retried).unwrap_err();
    assert!(matches!(err, Error::TerminalAction { ref status, .. } if status == "synced"));
    assert!(matches!(store.put_queue_entry(&pending), Err(Error::TerminalAction { .. })));

    let stored = store.list_queue().unwrap();
    assert_eq!(stored, vec![synced]);
    assert_eq!(stored[0].retry_count(), 0);
}

pub fn settling_unknown_action_writes_nothing(store: &dyn LocalStore) {
    store.init().unwrap();
    let mut action = pending_action(ActionKind::CheckIn, &sample_record("G1", "ABC123"), 1_000);
    action.mark_synced().unwrap();

    assert!(!store.settle_action(&action).unwrap());
    assert!(!store.commit_synced(&action).unwrap());
    assert!(store.list_queue().unwrap().is_empty());
    assert!(store.get_all().unwrap().is_empty());
}

pub fn commit_synced_marks_matching_record(store: &dyn LocalStore) {
    store.init().unwrap();
    let record = record_with_bags("G1", "ABC123", 1);
    let mut action = pending_action(ActionKind::BaggageAdd, &record, 1_000);
    store.record_mutation(&record, &action).unwrap();

    action.mark_synced().unwrap();
    assert!(store.commit_synced(&action).unwrap());

    assert!(store.get_by_key(&record.key()).unwrap().unwrap().synced);
    assert_eq!(store.list_queue().unwrap()[0].status(), QueueStatus::Synced);
}

pub fn commit_synced_keeps_newer_edit(store: &dyn LocalStore) {
    store.init().unwrap();
    let old = sample_record("G1", "ABC123");
    let new = record_with_bags("G1", "ABC123", 1);
    let mut first = pending_action(ActionKind::CheckIn, &old, 1_000);
    store.record_mutation(&old, &first).unwrap();
    store.record_mutation(&new, &pending_action(ActionKind::BaggageAdd, &new, 2_000)).unwrap();

    first.mark_synced().unwrap();
    assert!(!store.commit_synced(&first).unwrap());

    assert_eq!(store.get_by_key(&new.key()).unwrap(), Some(new));
    assert_eq!(store.list_pending().unwrap().len(), 1);
    assert_eq!(store.list_queue().unwrap()[0].status(), QueueStatus::Synced);
}

pub fn replace_record_refuses_stale_base(store: &dyn LocalStore) {
    store.init().unwrap();
    let base = sample_record("G1", "ABC123");
    store.upsert(&base).unwrap();

    let mut concurrent = base.clone();
    concurrent.seat_number = "14C".to_string();
    store.upsert(&concurrent).unwrap();

    let mut edit = base.clone();
    edit.checked_in = true;
    let action = pending_action(ActionKind::CheckIn, &edit, 1_000);
    assert!(!store.replace_record(&base, &edit, &action).unwrap());
    assert_eq!(store.get_by_key(&base.key()).unwrap(), Some(concurrent.clone()));
    assert!(store.list_queue().unwrap().is_empty());

    let mut edit = concurrent.clone();
    edit.checked_in = true;
    let action = pending_action(ActionKind::CheckIn, &edit, 2_000);
    assert!(store.replace_record(&concurrent, &edit, &action).unwrap());
    assert_eq!(store.get_by_key(&base.key()).unwrap(), Some(edit));
    assert_eq!(store.list_pending().unwrap(), vec![action]);
}

/// Expands to one `#[test]` per conformance check, each building a fresh
/// store with `$make`.
macro_rules! conformance_tests {
    (@each $make:expr; $($name:ident),*) => {
        $(
            #[test]
            fn $name() {
                let store = $make;
                $crate::store::conformance::$name(&store);
            }
        )*
    };
    ($make:expr) => {
        conformance_tests!(@each $make;
            rejects_use_before_init,
            init_is_idempotent,
            missing_lookups_are_empty,
            upsert_replaces_by_key,
            locator_lookup_spans_groups,
            pending_in_enqueue_order,
            queue_entry_status_persists,
            record_mutation_writes_both,
            delete_and_purge,
            clear_all_empties_everything,
            settled_action_is_frozen,
            settling_unknown_action_writes_nothing,
            commit_synced_marks_matching_record,
            commit_synced_keeps_newer_edit,
            replace_record_refuses_stale_base
        );
    };
}

pub(crate) use conformance_tests;
