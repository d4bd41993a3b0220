// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sd_core::LocalStore;

use crate::error::{Error, Result};

use super::open_desk;

/// Empties both local containers. Pending actions are lost, so the count is
/// reported first.
pub fn run(yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::ConfirmationRequired);
    }
    let desk = open_desk()?;
    let pending = desk.store.list_pending()?.len();
    desk.store.clear_all()?;
    if pending > 0 {
        println!("Discarded {pending} unsynced actions");
    }
    println!("Local data erased");
    Ok(())
}
