// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot sync.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sync::{ConnectivityMonitor, SyncOutcome};

use super::{build_adapter, build_probe, open_desk};

pub async fn run() -> Result<()> {
    let desk = open_desk()?;
    let target = desk.remote_target().ok_or(Error::NoRemote)?;
    let adapter = build_adapter(&desk, &target)?;
    let probe = build_probe(&desk, &target)?;

    let monitor = Arc::new(ConnectivityMonitor::new(probe.probe().await));
    if !monitor.is_online() {
        return Err(Error::Offline);
    }

    let service = desk.sync_service(adapter, monitor);
    let outcome = service.manual_sync().await?;
    println!("{}", summary(&outcome));
    Ok(())
}

pub(crate) fn summary(outcome: &SyncOutcome) -> String {
    format!("Sync complete: {} succeeded, {} failed", outcome.success, outcome.failed)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
