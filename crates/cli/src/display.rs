// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sd_core::{Baggage, CheckInRecord, QueueStatus, QueuedAction};

/// Format a single record line for lists.
///
/// ```text
/// - ABC123 (G1) Jane Smith CX500 HKG→NRT 2026-03-14 [checked in, unsynced]
/// ```
pub fn format_record_line(record: &CheckInRecord) -> String {
    let check = if record.checked_in { "checked in" } else { "not checked in" };
    let sync = if record.synced { "synced" } else { "unsynced" };
    format!(
        "- {} ({}) {} {} {}→{} {} [{}, {}]",
        record.record_locator,
        record.booking_group_id,
        record.passenger_name,
        record.flight_number,
        record.origin,
        record.destination,
        record.date,
        check,
        sync
    )
}

fn format_bag(bag: &Baggage) -> String {
    format!("  - {} {:.1} kg {} ({})", bag.tag_number, bag.weight, bag.color, bag.status)
}

/// Format record details for lookup output.
pub fn format_record_details(record: &CheckInRecord) -> String {
    let mut output = Vec::new();

    output.push(format!("[{}] {}", record.booking_group_id, record.record_locator));
    output.push(format!("Passenger: {}", record.passenger_name));
    output.push(format!(
        "Flight: {} {}→{} on {}",
        record.flight_number, record.origin, record.destination, record.date
    ));
    if !record.seat_number.is_empty() {
        output.push(format!("Seat: {}", record.seat_number));
    }
    output.push(format!("Checked in: {}", if record.checked_in { "yes" } else { "no" }));
    output.push(format!(
        "Modified: {} by {}",
        record.modified_at.format("%Y-%m-%d %H:%M"),
        record.desk_id
    ));
    output.push(format!("Synced: {}", if record.synced { "yes" } else { "no" }));

    if !record.baggage.is_empty() {
        output.push(String::new());
        output.push("Baggage:".to_string());
        output.extend(record.baggage.iter().map(format_bag));
    }

    output.join("\n")
}

/// Format a queued action line for the reconciliation view.
pub fn format_action_line(action: &QueuedAction) -> String {
    let mut line = format!("- [{}] {} {}", action.status(), action.kind(), action.key());
    if action.retry_count() > 0 {
        line.push_str(&format!(" (retries: {})", action.retry_count()));
    }
    if let Some(err) = action.error_message() {
        line.push_str(&format!(": {err}"));
    }
    line
}

/// Per-status counts over a set of queued actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub pending: usize,
    pub synced: usize,
    pub failed: usize,
}

impl QueueSummary {
    pub fn tally(actions: &[QueuedAction]) -> Self {
        let mut summary = QueueSummary::default();
        for action in actions {
            match action.status() {
                QueueStatus::Pending => summary.pending += 1,
                QueueStatus::Synced => summary.synced += 1,
                QueueStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}

impl std::fmt::Display for QueueSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pending, {} synced, {} failed", self.pending, self.synced, self.failed)
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
