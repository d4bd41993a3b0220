// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic sync timer.
//!
//! While started, the scheduler runs one cycle immediately and then one per
//! interval. Stopping cancels future cycles only: a cycle already running is
//! left to finish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::engine::SyncEngine;

struct Running {
    cancel: CancellationToken,
    // Detached on stop so an in-flight cycle completes.
    _task: JoinHandle<()>,
}

pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    interval: Duration,
    running: Mutex<Option<Running>>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>, interval: Duration) -> Self {
        SyncScheduler { engine, interval, running: Mutex::new(None) }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Starts the timer. Returns `false` when it was already running or no
    /// tokio runtime is available.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.is_some() {
            return false;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "cannot start sync timer outside a runtime");
                return false;
            }
        };

        let cancel = CancellationToken::new();
        let task = handle.spawn(tick_loop(Arc::clone(&self.engine), self.interval, cancel.clone()));
        *running = Some(Running { cancel, _task: task });
        debug!(interval_secs = self.interval.as_secs(), "sync timer started");
        true
    }

    /// Cancels the timer. Returns `false` when it was not running.
    pub fn stop(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        match running.take() {
            Some(r) => {
                r.cancel.cancel();
                debug!("sync timer stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_loop(engine: Arc<SyncEngine>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }
        if let Err(e) = engine.run_cycle().await {
            warn!(error = %e, "scheduled sync failed");
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
