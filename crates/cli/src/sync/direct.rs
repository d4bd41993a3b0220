// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Direct strategy: writes into the remote table without an intermediary.

use std::path::Path;

use sd_core::{CheckInRecord, RemoteTable};
use tokio::sync::Mutex;
use tracing::debug;

use super::adapter::{RemoteAdapter, RemoteError, RemoteFuture};

/// Adapter that owns a handle to the remote table.
///
/// Every record written through it is stamped `synced = true`.
pub struct DirectAdapter {
    table: Mutex<RemoteTable>,
}

impl DirectAdapter {
    /// Opens the remote table at `path`.
    pub fn open(path: &Path) -> Result<Self, RemoteError> {
        let table = RemoteTable::open(path).map_err(map_table_error)?;
        Ok(Self::with_table(table))
    }

    pub fn with_table(table: RemoteTable) -> Self {
        DirectAdapter { table: Mutex::new(table) }
    }
}

/// Record problems are permanent; everything else (locking, disk) may clear.
fn map_table_error(e: sd_core::Error) -> RemoteError {
    match e {
        sd_core::Error::Validation(msg) => RemoteError::Validation(msg),
        other => RemoteError::Transient(other.to_string()),
    }
}

impl RemoteAdapter for DirectAdapter {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn put<'a>(&'a self, record: &'a CheckInRecord) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let mut item = record.clone();
            item.synced = true;
            let table = self.table.lock().await;
            table.put(&item).map_err(map_table_error)?;
            debug!(key = %item.key(), "direct write");
            Ok(())
        })
    }

    fn query_by_locator<'a>(
        &'a self,
        record_locator: &'a str,
    ) -> RemoteFuture<'a, Vec<CheckInRecord>> {
        Box::pin(async move {
            let table = self.table.lock().await;
            table.query_by_locator(record_locator).map_err(map_table_error)
        })
    }
}

#[cfg(test)]
#[path = "direct_tests.rs"]
mod tests;
