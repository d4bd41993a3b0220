// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutation intents.
//!
//! A [`QueuedAction`] is an immutable snapshot of a record taken when a desk
//! mutation happened. Only its delivery bookkeeping (status, retry count,
//! error message) ever changes, and only through the transition methods
//! below: once an action is `synced` or `failed` it is frozen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::Stamp;
use crate::error::{Error, Result};
use crate::record::{CheckInRecord, CompositeKey};

/// What kind of desk mutation produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Check-in confirmation.
    CheckIn,
    /// A bag was tagged.
    BaggageAdd,
    /// Any other edit (bag removal, seat change).
    Update,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CheckIn => "check-in",
            ActionKind::BaggageAdd => "baggage-add",
            ActionKind::Update => "update",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "check-in" => Ok(ActionKind::CheckIn),
            "baggage-add" => Ok(ActionKind::BaggageAdd),
            "update" => Ok(ActionKind::Update),
            _ => Err(Error::InvalidActionKind(s.to_string())),
        }
    }
}

/// Delivery state of a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// Waiting for a sync cycle.
    Pending,
    /// Written remotely. Kept for history.
    Synced,
    /// Gave up. A new edit is needed to try again.
    Failed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Synced => "synced",
            QueueStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, QueueStatus::Pending)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(QueueStatus::Pending),
            "synced" => Ok(QueueStatus::Synced),
            "failed" => Ok(QueueStatus::Failed),
            _ => Err(Error::InvalidQueueStatus(s.to_string())),
        }
    }
}

/// A snapshot of a mutation waiting to be written remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    id: String,
    kind: ActionKind,
    payload: CheckInRecord,
    enqueued_at: Stamp,
    status: QueueStatus,
    retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl QueuedAction {
    /// Creates a pending action. The id embeds the stamp, so ids from one
    /// [`StampClock`](crate::clock::StampClock) never collide.
    pub fn new(kind: ActionKind, payload: CheckInRecord, enqueued_at: Stamp) -> Self {
        let id = format!("{}-{}-{}", kind, enqueued_at, payload.key());
        QueuedAction {
            id,
            kind,
            payload,
            enqueued_at,
            status: QueueStatus::Pending,
            retry_count: 0,
            error_message: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn payload(&self) -> &CheckInRecord {
        &self.payload
    }

    pub fn key(&self) -> CompositeKey {
        self.payload.key()
    }

    pub fn enqueued_at(&self) -> Stamp {
        self.enqueued_at
    }

    pub fn status(&self) -> QueueStatus {
        self.status
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == QueueStatus::Pending
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::TerminalAction {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Marks the action delivered.
    pub fn mark_synced(&mut self) -> Result<()> {
        self.ensure_pending()?;
        self.status = QueueStatus::Synced;
        Ok(())
    }

    /// Records a failed delivery attempt and returns the resulting status.
    ///
    /// The retry count always goes up by one. The action becomes `failed`
    /// when the error is not retryable or the count reaches `max_retries`;
    /// otherwise it stays `pending` for a later cycle.
    pub fn record_failure(
        &mut self,
        message: impl Into<String>,
        retryable: bool,
        max_retries: u32,
    ) -> Result<QueueStatus> {
        self.ensure_pending()?;
        self.retry_count = self.retry_count.saturating_add(1);
        self.error_message = Some(message.into());
        if !retryable || self.retry_count >= max_retries {
            self.status = QueueStatus::Failed;
        }
        Ok(self.status)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
