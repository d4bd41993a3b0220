// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: drains pending actions into the remote adapter.
//!
//! A cycle reads every `pending` action in enqueue order and pushes each
//! payload. Successes mark the action `synced` and, when the local record
//! still holds the pushed snapshot, mark the record synced too. Failures bump
//! the retry count and give up after [`SyncPolicy::max_retries`] attempts, or
//! immediately when the remote refused the record. One action failing never
//! stops the rest of the batch.
//!
//! Only one cycle runs at a time. A cycle requested while another is in
//! progress returns an empty outcome straight away. With a cycle lock file
//! configured this holds across processes sharing one local store too.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sd_core::{CompositeKey, LocalStore, QueueStatus, QueuedAction};
use tracing::{debug, info, warn};

use super::adapter::{RemoteAdapter, RemoteError};
use super::connectivity::ConnectivityMonitor;

/// Retry and timeout rules for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Attempts before a retryable failure becomes terminal.
    pub max_retries: u32,
    /// Upper bound on a single remote write.
    pub remote_timeout: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy { max_retries: 3, remote_timeout: Duration::from_secs(15) }
    }
}

/// Counts from one cycle. `success + failed` equals the number of pending
/// actions the cycle read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: usize,
    pub failed: usize,
}

/// A cycle that could not run at all.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("local store unavailable: {0}")]
    Store(#[from] sd_core::Error),

    #[error("cannot open sync lock {}: {source}", path.display())]
    Lock { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Syncing,
}

/// Holds the syncing flag for one cycle and clears it when dropped.
struct CycleGuard<'a>(&'a AtomicBool);

impl<'a> CycleGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CycleGuard(flag))
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Takes the exclusive cycle lock without waiting. `None` means another
/// process holds it. The lock is released when the file is closed.
fn try_lock_cycle(path: &Path) -> Result<Option<File>, SyncError> {
    use fs2::FileExt;

    let lock_err = |source| SyncError::Lock { path: path.to_path_buf(), source };
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(lock_err)?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(file)),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
        Err(e) => Err(lock_err(e)),
    }
}

pub struct SyncEngine {
    store: Arc<dyn LocalStore>,
    adapter: Arc<dyn RemoteAdapter>,
    monitor: Arc<ConnectivityMonitor>,
    policy: SyncPolicy,
    syncing: AtomicBool,
    cycle_lock: Option<PathBuf>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn LocalStore>,
        adapter: Arc<dyn RemoteAdapter>,
        monitor: Arc<ConnectivityMonitor>,
        policy: SyncPolicy,
    ) -> Self {
        SyncEngine {
            store,
            adapter,
            monitor,
            policy,
            syncing: AtomicBool::new(false),
            cycle_lock: None,
        }
    }

    /// Also serializes cycles with every other engine locking `path`.
    pub fn with_cycle_lock(mut self, path: PathBuf) -> Self {
        self.cycle_lock = Some(path);
        self
    }

    pub fn state(&self) -> EngineState {
        if self.syncing.load(Ordering::Acquire) {
            EngineState::Syncing
        } else {
            EngineState::Idle
        }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Runs one sync cycle.
    ///
    /// Returns `{0, 0}` without touching the store when a cycle is already
    /// running (here or, with a cycle lock, in another process) or the
    /// monitor reports offline. Fails only when the cycle lock cannot be
    /// opened or the pending list cannot be read.
    pub async fn run_cycle(&self) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = CycleGuard::acquire(&self.syncing) else {
            debug!("sync already in progress");
            return Ok(SyncOutcome::default());
        };
        if !self.monitor.is_online() {
            debug!("offline, skipping sync");
            return Ok(SyncOutcome::default());
        }
        let _lock = match &self.cycle_lock {
            Some(path) => match try_lock_cycle(path)? {
                Some(file) => Some(file),
                None => {
                    debug!(lock = %path.display(), "sync running in another process");
                    return Ok(SyncOutcome::default());
                }
            },
            None => None,
        };

        let pending = self.store.list_pending()?;
        let mut outcome = SyncOutcome::default();
        // Keys whose earlier action is still pending after failing this cycle.
        let mut held: HashSet<CompositeKey> = HashSet::new();

        for mut action in pending {
            let key = action.key();
            if held.contains(&key) {
                debug!(id = action.id(), %key, "deferred behind an earlier pending action");
                outcome.failed += 1;
                continue;
            }

            match self.push(&action).await {
                Ok(()) => match self.commit_success(&mut action) {
                    Ok(()) => outcome.success += 1,
                    Err(e) => {
                        outcome.failed += 1;
                        if !settled_elsewhere(&action, &e) {
                            warn!(id = action.id(), error = %e, "pushed but could not record success");
                            held.insert(key);
                        }
                    }
                },
                Err(remote) => {
                    outcome.failed += 1;
                    match self.commit_failure(&mut action, &remote) {
                        Ok(QueueStatus::Pending) => {
                            held.insert(key);
                        }
                        Ok(_) => {}
                        Err(e) if settled_elsewhere(&action, &e) => {}
                        Err(e) => {
                            warn!(id = action.id(), error = %e, "could not record failure");
                            held.insert(key);
                        }
                    }
                }
            }
        }

        info!(
            adapter = self.adapter.name(),
            success = outcome.success,
            failed = outcome.failed,
            "sync cycle complete"
        );
        Ok(outcome)
    }

    async fn push(&self, action: &QueuedAction) -> Result<(), RemoteError> {
        match tokio::time::timeout(self.policy.remote_timeout, self.adapter.put(action.payload()))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Transient(format!(
                "no answer within {}s",
                self.policy.remote_timeout.as_secs_f64()
            ))),
        }
    }

    fn commit_success(&self, action: &mut QueuedAction) -> sd_core::Result<()> {
        action.mark_synced()?;
        // Leaves the local record alone when a newer edit is queued behind
        // this one.
        let record_synced = self.store.commit_synced(action)?;
        debug!(id = action.id(), record_synced, "action synced");
        Ok(())
    }

    fn commit_failure(
        &self,
        action: &mut QueuedAction,
        error: &RemoteError,
    ) -> sd_core::Result<QueueStatus> {
        let status =
            action.record_failure(error.to_string(), error.is_retryable(), self.policy.max_retries)?;
        if !self.store.settle_action(action)? {
            debug!(id = action.id(), "action left the queue during the cycle");
        }
        if status == QueueStatus::Failed {
            warn!(id = action.id(), retries = action.retry_count(), error = %error, "action failed");
        } else {
            debug!(id = action.id(), retries = action.retry_count(), error = %error, "will retry");
        }
        Ok(status)
    }
}

/// Whether `error` says the stored action was already settled by another
/// sync. Later actions for the same key may still go this cycle.
fn settled_elsewhere(action: &QueuedAction, error: &sd_core::Error) -> bool {
    let settled = matches!(error, sd_core::Error::TerminalAction { .. });
    if settled {
        debug!(id = action.id(), "already settled by another sync");
    }
    settled
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
