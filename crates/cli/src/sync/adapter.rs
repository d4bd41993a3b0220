// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote adapter abstraction.
//!
//! A [`RemoteAdapter`] knows how to write one record to the remote store and
//! how to read records back by record locator. Two strategies exist:
//! - [`DirectAdapter`](super::DirectAdapter) writes straight into the remote table
//! - [`GatewayAdapter`](super::GatewayAdapter) goes through the HTTP gateway
//!
//! Tests use in-memory fakes behind the same trait.

use std::future::Future;
use std::pin::Pin;

use sd_core::CheckInRecord;

/// Failure of a remote operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote rejected the record. Retrying the same payload cannot
    /// succeed.
    #[error("remote rejected record: {0}")]
    Validation(String),

    /// Network, timeout, or server trouble. Worth retrying later.
    #[error("remote unavailable: {0}")]
    Transient(String),
}

impl RemoteError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by adapter methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Write and query capability against the remote store.
pub trait RemoteAdapter: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Writes the record, replacing whatever the remote holds under its key.
    fn put<'a>(&'a self, record: &'a CheckInRecord) -> RemoteFuture<'a, ()>;

    /// Every remote record with this record locator.
    fn query_by_locator<'a>(&'a self, record_locator: &'a str)
        -> RemoteFuture<'a, Vec<CheckInRecord>>;
}

impl<A: RemoteAdapter + ?Sized> RemoteAdapter for std::sync::Arc<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn put<'a>(&'a self, record: &'a CheckInRecord) -> RemoteFuture<'a, ()> {
        (**self).put(record)
    }

    fn query_by_locator<'a>(
        &'a self,
        record_locator: &'a str,
    ) -> RemoteFuture<'a, Vec<CheckInRecord>> {
        (**self).query_by_locator(record_locator)
    }
}
