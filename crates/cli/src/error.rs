// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{RemoteError, SyncError};

/// All possible errors that can occur in the skydesk library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'skydesk init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid desk id: must not be empty")]
    InvalidDeskId,

    #[error("no check-in found for record locator {0}")]
    RecordNotFound(String),

    #[error("record locator {locator} covers several booking groups: {}\n  hint: pass --group to pick one", groups.join(", "))]
    AmbiguousLocator { locator: String, groups: Vec<String> },

    #[error("bag {tag} not found on {key}")]
    BagNotFound { tag: String, key: String },

    #[error("check-in {0} kept changing while being edited\n  hint: run the command again")]
    EditConflict(String),

    #[error("no remote configured\n  hint: set [remote] gateway_url or direct_table in .skydesk/config.toml")]
    NoRemote,

    #[error("remote is unreachable; actions stay queued until the link returns")]
    Offline,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("refusing to erase local data without --yes")]
    ConfirmationRequired,

    #[error(transparent)]
    Core(#[from] sd_core::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for skydesk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
