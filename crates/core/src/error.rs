// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sd-core operations.

use thiserror::Error;

/// All possible errors that can occur in sd-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("local store not initialized\n  hint: call init() before any other store operation")]
    NotInitialized,

    #[error("invalid record: {0}")]
    Validation(String),

    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: check-in, baggage-add, update")]
    InvalidActionKind(String),

    #[error("invalid queue status: '{0}'\n  hint: valid statuses are: pending, synced, failed")]
    InvalidQueueStatus(String),

    #[error("invalid baggage status: '{0}'\n  hint: valid statuses are: CHECKED, LOADED, OFFLOADED")]
    InvalidBaggageStatus(String),

    #[error("queued action {id} is already {status} and cannot change state")]
    TerminalAction { id: String, status: String },

    #[error("csv line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("wire format error: {0}")]
    Wire(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for sd-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
