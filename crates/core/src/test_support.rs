// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for sd-core unit tests.

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc};

use crate::clock::Stamp;
use crate::queue::{ActionKind, QueuedAction};
use crate::record::{Baggage, CheckInRecord};

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

/// A pending action stamped at `wall_ms`.
pub fn pending_action(kind: ActionKind, record: &CheckInRecord, wall_ms: u64) -> QueuedAction {
    QueuedAction::new(kind, record.clone(), Stamp::new(wall_ms, 0))
}
