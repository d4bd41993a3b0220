// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::io::Write;

use sd_core::csv::{write_pending_actions, write_records};
use sd_core::LocalStore;

use crate::error::Result;

use super::open_desk;

pub fn run(pending: bool, output: Option<&str>) -> Result<()> {
    let desk = open_desk()?;
    let (content, count) = run_impl(desk.store.as_ref(), pending)?;
    let what = if pending { "pending actions" } else { "records" };

    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!("Exported {count} {what} to {path}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Internal implementation that accepts the store for testing. Returns the
/// CSV text and the number of data rows.
pub(crate) fn run_impl(store: &dyn LocalStore, pending: bool) -> Result<(String, usize)> {
    if pending {
        let actions = store.list_pending()?;
        Ok((write_pending_actions(&actions), actions.len()))
    } else {
        let records = store.get_all()?;
        Ok((write_records(&records)?, records.len()))
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
