// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation view over the sync queue.

use sd_core::{LocalStore, QueuedAction};

use crate::cli::QueueCommand;
use crate::display::{format_action_line, QueueSummary};
use crate::error::Result;

use super::open_desk;

pub fn run(all: bool, command: Option<&QueueCommand>) -> Result<()> {
    let desk = open_desk()?;
    match command {
        Some(QueueCommand::Purge) => {
            let purged = desk.store.purge_synced()?;
            println!("Purged {purged} synced actions");
        }
        None => {
            let (shown, summary) = run_impl(desk.store.as_ref(), all)?;
            for action in &shown {
                println!("{}", format_action_line(action));
            }
            if !shown.is_empty() {
                println!();
            }
            println!("Queue: {summary}");
        }
    }
    Ok(())
}

/// Actions to list (pending only unless `all`) and counts over the whole
/// queue.
pub(crate) fn run_impl(
    store: &dyn LocalStore,
    all: bool,
) -> Result<(Vec<QueuedAction>, QueueSummary)> {
    let queue = store.list_queue()?;
    let summary = QueueSummary::tally(&queue);
    let shown = if all { queue } else { queue.into_iter().filter(QueuedAction::is_pending).collect() };
    Ok((shown, summary))
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
