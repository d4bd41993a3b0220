// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the remote table for shared access from request handlers.

use std::path::Path;
use std::sync::Arc;

use sd_core::{CheckInRecord, RemoteTable, Result};
use tokio::sync::Mutex;

const TABLE_FILE_NAME: &str = "checkins-remote.db";

/// Shared server state holding the remote table.
#[derive(Clone)]
pub struct AppState {
    table: Arc<Mutex<RemoteTable>>,
}

impl AppState {
    /// Opens (or creates) the table in the given data directory.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let table = RemoteTable::open(&data_dir.join(TABLE_FILE_NAME))?;
        Ok(Self::with_table(table))
    }

    pub fn with_table(table: RemoteTable) -> Self {
        AppState { table: Arc::new(Mutex::new(table)) }
    }

    /// Stores the record under its composite key, replacing any earlier
    /// version.
    pub async fn put(&self, record: &CheckInRecord) -> Result<()> {
        self.table.lock().await.put(record)
    }

    pub async fn query_by_locator(&self, record_locator: &str) -> Result<Vec<CheckInRecord>> {
        self.table.lock().await.query_by_locator(record_locator)
    }
}
