// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP routes in front of the remote table.
//!
//! ```text
//! POST    /check-in         wire-tagged record → 200 {message, bookingGroupId, recordLocator}
//! GET     /pnr/{locator}    → 200 [wire-tagged record, ...]
//! OPTIONS any route         → empty 200 with permissive CORS headers
//! ```
//!
//! Errors are `{"error": "..."}`: 400 for malformed or invalid records, 500
//! when the table fails, 404 for unknown routes.

use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use sd_core::wire::{self, Item};

use crate::state::AppState;

/// Request failures, rendered as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("Not found")]
    NotFound,
}

impl From<sd_core::Error> for ApiError {
    fn from(err: sd_core::Error) -> Self {
        match err {
            sd_core::Error::Validation(_) | sd_core::Error::Wire(_) => {
                ApiError::BadRequest(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(msg) => {
                error!("table error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PutResponse {
    message: &'static str,
    booking_group_id: String,
    record_locator: String,
}

/// Builds the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check-in", post(put_check_in).options(preflight))
        .route("/pnr/{locator}", get(query_pnr).options(preflight))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until the process is stopped.
pub async fn run(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

async fn put_check_in(
    State(state): State<AppState>,
    body: Result<Json<Item>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<PutResponse>, ApiError> {
    let Json(item) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = wire::unmarshal(&item)?;
    state.put(&record).await?;
    debug!(key = %record.key(), "stored check-in");

    Ok(Json(PutResponse {
        message: "Check-in synced successfully",
        booking_group_id: record.booking_group_id,
        record_locator: record.record_locator,
    }))
}

async fn query_pnr(
    State(state): State<AppState>,
    Path(locator): Path<String>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let records = state.query_by_locator(&locator).await?;
    debug!(%locator, count = records.len(), "pnr query");
    Ok(Json(records.iter().map(wire::marshal).collect()))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
