// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sd_core::QueuedAction;

use crate::cli::RecordArgs;
use crate::desk::DeskService;
use crate::error::Result;

use super::open_desk;

pub fn run(record: &RecordArgs, seat: Option<&str>) -> Result<()> {
    let desk = open_desk()?;
    let action = run_impl(&desk.service()?, record, seat)?;
    let payload = action.payload();
    print!("Checked in {} ({})", payload.passenger_name, payload.key());
    if !payload.seat_number.is_empty() {
        print!(", seat {}", payload.seat_number);
    }
    println!();
    println!("Queued {}", action.id());
    Ok(())
}

/// Internal implementation that accepts the service for testing.
pub(crate) fn run_impl(
    service: &DeskService,
    record: &RecordArgs,
    seat: Option<&str>,
) -> Result<QueuedAction> {
    let target = service.resolve(&record.locator, record.group.as_deref())?;
    service.check_in(&target.key(), seat)
}

#[cfg(test)]
#[path = "checkin_tests.rs"]
mod tests;
