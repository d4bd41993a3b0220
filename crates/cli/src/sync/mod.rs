// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync of queued desk mutations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ transitions ┌───────────────┐  ticks  ┌──────────────┐
//! │ Connectivity │────────────►│ SyncScheduler │────────►│  SyncEngine  │
//! │   Monitor    │             └───────────────┘         │ (run_cycle)  │
//! └──────────────┘                                       └──────┬───────┘
//!        ▲                                                      │ put
//!        │ probe                  ┌────────────┐                ▼
//!   watch_link                    │ LocalStore │◄──────┌───────────────┐
//!                                 │  (queue)   │ status│ RemoteAdapter │
//!                                 └────────────┘       │ direct/gateway│
//!                                                      └───────────────┘
//! ```
//!
//! [`SyncService`] wires these together; `skydesk watch` runs it until
//! interrupted and `skydesk sync` calls [`SyncService::manual_sync`] once.

mod adapter;
mod connectivity;
mod direct;
mod engine;
mod gateway;
mod scheduler;
mod service;

pub use adapter::{RemoteAdapter, RemoteError, RemoteFuture, RemoteResult};
pub use connectivity::{
    watch_link, ConnectivityMonitor, LinkProbe, PathProbe, Subscription, TcpProbe,
};
pub use direct::DirectAdapter;
pub use engine::{EngineState, SyncEngine, SyncError, SyncOutcome, SyncPolicy};
pub use gateway::GatewayAdapter;
pub use scheduler::SyncScheduler;
pub use service::SyncService;

#[cfg(test)]
pub(crate) mod test_helpers;
