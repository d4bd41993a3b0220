// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bag tagging commands.

use sd_core::{Baggage, BaggageStatus, QueuedAction};

use crate::cli::{BagCommand, RecordArgs};
use crate::desk::DeskService;
use crate::error::Result;

use super::open_desk;

pub fn run(command: &BagCommand) -> Result<()> {
    let desk = open_desk()?;
    let service = desk.service()?;

    match command {
        BagCommand::Add { record, weight, color } => {
            let (bag, action) = add(&service, record, *weight, color)?;
            println!("Tagged bag {} ({:.1} kg, {})", bag.tag_number, bag.weight, bag.color);
            println!("Queued {}", action.id());
        }
        BagCommand::Remove { record, tag } => {
            let action = remove(&service, record, tag)?;
            println!("Removed bag {tag} from {}", action.key());
            println!("Queued {}", action.id());
        }
        BagCommand::Status { record, tag, state } => {
            let status = BaggageStatus::from(*state);
            let action = set_status(&service, record, tag, status)?;
            println!("Bag {tag} is now {status}");
            println!("Queued {}", action.id());
        }
    }
    Ok(())
}

pub(crate) fn add(
    service: &DeskService,
    record: &RecordArgs,
    weight: f64,
    color: &str,
) -> Result<(Baggage, QueuedAction)> {
    let target = service.resolve(&record.locator, record.group.as_deref())?;
    service.add_baggage(&target.key(), weight, color)
}

pub(crate) fn remove(service: &DeskService, record: &RecordArgs, tag: &str) -> Result<QueuedAction> {
    let target = service.resolve(&record.locator, record.group.as_deref())?;
    service.remove_baggage(&target.key(), tag.trim())
}

pub(crate) fn set_status(
    service: &DeskService,
    record: &RecordArgs,
    tag: &str,
    status: BaggageStatus,
) -> Result<QueuedAction> {
    let target = service.resolve(&record.locator, record.group.as_deref())?;
    service.set_bag_status(&target.key(), tag.trim(), status)
}

#[cfg(test)]
#[path = "bag_tests.rs"]
mod tests;
