// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway strategy: exchanges tagged wire items with the HTTP gateway.
//!
//! - `POST {base}/check-in` with one item, answered by a key echo
//! - `GET {base}/pnr/{locator}`, answered by an array of items
//!
//! Non-2xx answers carry `{"error": "..."}`. A 4xx (other than 408 and 429)
//! means the record itself was refused; every other failure is transient.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use sd_core::wire::{self, Item};
use sd_core::CheckInRecord;
use serde::Deserialize;
use tracing::debug;

use super::adapter::{RemoteAdapter, RemoteError, RemoteFuture, RemoteResult};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the gateway.
pub struct GatewayAdapter {
    client: Client,
    base: Url,
}

impl GatewayAdapter {
    /// Creates an adapter for the gateway at `base_url`. Each request is
    /// bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| RemoteError::Validation(format!("invalid gateway URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Validation(format!("invalid gateway URL '{base_url}'")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transient(e.to_string()))?;
        Ok(GatewayAdapter { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Validation(format!("invalid gateway URL '{}'", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn classify_status(status: StatusCode, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = format!("{status}: {message}");
    let permanent = status.is_client_error()
        && status != StatusCode::REQUEST_TIMEOUT
        && status != StatusCode::TOO_MANY_REQUESTS;
    if permanent {
        RemoteError::Validation(message)
    } else {
        RemoteError::Transient(message)
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Transient(e.to_string())
}

impl RemoteAdapter for GatewayAdapter {
    fn name(&self) -> &'static str {
        "gateway"
    }

    fn put<'a>(&'a self, record: &'a CheckInRecord) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let url = self.endpoint(&["check-in"])?;
            let response = self
                .client
                .post(url)
                .json(&wire::marshal(record))
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_status(status, &body));
            }
            debug!(key = %record.key(), "gateway write");
            Ok(())
        })
    }

    fn query_by_locator<'a>(
        &'a self,
        record_locator: &'a str,
    ) -> RemoteFuture<'a, Vec<CheckInRecord>> {
        Box::pin(async move {
            let url = self.endpoint(&["pnr", record_locator])?;
            let response = self.client.get(url).send().await.map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_status(status, &body));
            }

            let items: Vec<Item> = response.json().await.map_err(transport_error)?;
            items
                .iter()
                .map(|item| {
                    wire::unmarshal(item).map_err(|e| RemoteError::Transient(e.to_string()))
                })
                .collect()
        })
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
