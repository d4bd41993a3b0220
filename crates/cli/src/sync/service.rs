// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root for background sync.
//!
//! Wires the connectivity monitor to the scheduler: going online starts the
//! timer (which syncs at once), going offline stops it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sd_core::LocalStore;
use tracing::info;

use super::adapter::RemoteAdapter;
use super::connectivity::{ConnectivityMonitor, Subscription};
use super::engine::{SyncEngine, SyncError, SyncOutcome, SyncPolicy};
use super::scheduler::SyncScheduler;

pub struct SyncService {
    engine: Arc<SyncEngine>,
    scheduler: Arc<SyncScheduler>,
    monitor: Arc<ConnectivityMonitor>,
    subscription: Mutex<Option<Subscription>>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn LocalStore>,
        adapter: Arc<dyn RemoteAdapter>,
        monitor: Arc<ConnectivityMonitor>,
        policy: SyncPolicy,
        interval: Duration,
    ) -> Self {
        let engine = SyncEngine::new(store, adapter, Arc::clone(&monitor), policy);
        Self::with_engine(engine, monitor, interval)
    }

    /// Wraps an engine built elsewhere. `monitor` must be the one the engine
    /// consults.
    pub fn with_engine(
        engine: SyncEngine,
        monitor: Arc<ConnectivityMonitor>,
        interval: Duration,
    ) -> Self {
        let engine = Arc::new(engine);
        let scheduler = Arc::new(SyncScheduler::new(Arc::clone(&engine), interval));
        SyncService { engine, scheduler, monitor, subscription: Mutex::new(None) }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Subscribes to connectivity changes and, if already online, starts the
    /// timer. Calling it twice has no further effect.
    pub fn start(&self) {
        let mut subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if subscription.is_some() {
            return;
        }

        let scheduler = Arc::clone(&self.scheduler);
        *subscription = Some(self.monitor.subscribe(move |online| {
            if online {
                scheduler.start();
            } else {
                scheduler.stop();
            }
        }));

        let online = self.monitor.is_online();
        info!(online, "sync service started");
        if online {
            self.scheduler.start();
        }
    }

    /// Unsubscribes and stops the timer. An in-flight cycle completes.
    pub fn stop(&self) {
        let mut subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sub) = subscription.take() {
            self.monitor.unsubscribe(sub);
        }
        self.scheduler.stop();
        info!("sync service stopped");
    }

    /// Runs one cycle now, outside the timer. Shares the engine's guard, so
    /// it is a no-op while a scheduled cycle runs.
    pub async fn manual_sync(&self) -> Result<SyncOutcome, SyncError> {
        self.engine.run_cycle().await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
