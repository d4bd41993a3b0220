// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! skydesk - an offline-first airport check-in desk.
//!
//! This crate provides the functionality behind the `skydesk` CLI: every
//! desk mutation is written to a local store and queued, and queued actions
//! are pushed to a remote table whenever the link allows.
//!
//! # Main Components
//!
//! - [`DeskService`] - check-in and baggage mutations over a [`LocalStore`](sd_core::LocalStore)
//! - [`sync`] - remote adapters, connectivity monitor, sync engine and scheduler
//! - [`Config`] - desk configuration (desk id, remote target, sync cadence)
//! - [`Error`] - error types for all operations
//!
//! # Initialization
//!
//! ```rust,ignore
//! use skydesk::{find_work_dir, init_work_dir, Config};
//!
//! let work_dir = init_work_dir(Path::new("."), &Config::new("HKG-F32".into())?)?;
//!
//! // Later, find an existing desk
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! ```

mod cli;
mod commands;
mod display;
mod env;

pub mod config;
pub mod desk;
pub mod error;
pub mod sync;

pub use cli::{BagCommand, BagState, Cli, Command, QueueCommand, RecordArgs};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use desk::DeskService;
pub use error::{Error, Result};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { desk_id, gateway, direct, path } => {
            commands::init::run(desk_id, gateway, direct, path)
        }
        Command::Import { file } => commands::import::run(&file),
        Command::Lookup { locator } => commands::lookup::run(&locator).await,
        Command::CheckIn { record, seat } => commands::checkin::run(&record, seat.as_deref()),
        Command::Bag(cmd) => commands::bag::run(&cmd),
        Command::Queue { all, command } => commands::queue::run(all, command.as_ref()),
        Command::Sync => commands::sync::run().await,
        Command::Watch => commands::watch::run().await,
        Command::Export { pending, output } => commands::export::run(pending, output.as_deref()),
        Command::Reset { yes } => commands::reset::run(yes),
    }
}
