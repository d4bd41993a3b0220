// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground sync loop.
//!
//! Samples the link once, hands the composition root to a [`SyncService`],
//! and polls the link probe until Ctrl-C. Logs go to `.skydesk/watch.log`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::get_log_path;
use crate::error::{Error, Result};
use crate::sync::{watch_link, ConnectivityMonitor};

use super::init::describe_target;
use super::{build_adapter, build_probe, open_desk};

pub async fn run() -> Result<()> {
    let desk = open_desk()?;
    let target = desk.remote_target().ok_or(Error::NoRemote)?;
    let log_path = get_log_path(&desk.work_dir);
    setup_logging(&log_path);

    let adapter = build_adapter(&desk, &target)?;
    let probe = build_probe(&desk, &target)?;
    let online = probe.probe().await;
    tracing::info!(remote = %describe_target(&target), online, "watch starting");

    let monitor = Arc::new(ConnectivityMonitor::new(online));
    let service = desk.sync_service(adapter, Arc::clone(&monitor));
    service.start();

    let cancel = CancellationToken::new();
    let link = tokio::spawn(watch_link(
        probe,
        monitor,
        desk.config.sync.probe_interval(),
        cancel.clone(),
    ));

    println!("Watching {} ({})", describe_target(&target), if online { "online" } else { "offline" });
    println!("Logging to {}", log_path.display());
    println!("Press Ctrl-C to stop");

    let signal = tokio::signal::ctrl_c().await;
    cancel.cancel();
    join_link(link).await;
    service.stop();
    tracing::info!("watch stopped");
    signal?;
    Ok(())
}

/// Waits for the link watcher to wind down. Returns `false` (and logs) when
/// it panicked or was aborted instead of returning.
async fn join_link(link: JoinHandle<()>) -> bool {
    match link.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "link watcher ended abnormally");
            false
        }
    }
}

fn setup_logging(log_path: &Path) {
    let filter = EnvFilter::try_from_env(crate::env::log_filter_var())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open log file, fall back to stderr
    let result = if let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(log_path) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init()
    };
    if let Err(e) = result {
        eprintln!("warning: logging unavailable: {e}");
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
