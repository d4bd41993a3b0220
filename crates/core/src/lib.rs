// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sd-core: shared library for the skydesk check-in desk
//!
//! Data model, enqueue clock, Local Store, remote table, and the wire and CSV
//! formats used by the skydesk CLI and the sd-gateway server.

pub mod clock;
pub mod csv;
pub mod error;
pub mod queue;
pub mod record;
pub mod remote_table;
pub mod store;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use clock::{ClockSource, ManualClock, Stamp, StampClock, SystemClock};
pub use error::{Error, Result};
pub use queue::{ActionKind, QueueStatus, QueuedAction};
pub use record::{Baggage, BaggageStatus, CheckInRecord, CompositeKey};
pub use remote_table::RemoteTable;
pub use store::{LocalStore, MemoryStore, SqliteStore};
