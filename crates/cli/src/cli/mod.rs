// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand};

pub use args::{BagState, RecordArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser)]
#[command(name = "skydesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first airport check-in desk")]
#[command(
    long_about = "Offline-first airport check-in desk.\n\n\
    Check-ins and bag tags are written locally first and queued; queued actions \
    sync to the remote whenever the link is up."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a desk in the current directory
    #[command(after_help = "\
Examples:
  skydesk init --desk-id HKG-F32 --gateway http://10.0.0.5:7890
  skydesk init --direct /mnt/ops/checkins-remote.db
  skydesk init                       Local-only desk (actions queue, never sync)")]
    Init {
        /// Desk identifier stamped on every mutation
        #[arg(long, value_parser = non_empty_string)]
        desk_id: Option<String>,

        /// Sync through the HTTP gateway at this base URL
        #[arg(long, conflicts_with = "direct")]
        gateway: Option<String>,

        /// Sync by writing straight into this remote table file
        #[arg(long)]
        direct: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Load passenger records from a CSV manifest
    Import {
        /// CSV file with a header row
        file: String,
    },

    /// Show the records held for a locator, fetching from the remote if
    /// none are held locally
    Lookup {
        #[arg(value_parser = non_empty_string)]
        locator: String,
    },

    /// Confirm a passenger's check-in
    #[command(name = "checkin")]
    CheckIn {
        #[command(flatten)]
        record: RecordArgs,

        /// Assign or change the seat
        #[arg(long, short)]
        seat: Option<String>,
    },

    /// Tag, remove, or load bags
    #[command(subcommand)]
    Bag(BagCommand),

    /// Show queued actions and their sync status
    Queue {
        /// Include synced and failed actions
        #[arg(long, short)]
        all: bool,

        #[command(subcommand)]
        command: Option<QueueCommand>,
    },

    /// Push pending actions to the remote once
    Sync,

    /// Keep syncing in the foreground while the link is up (Ctrl-C to stop)
    Watch,

    /// Write records, or the pending actions, as CSV
    Export {
        /// Export the pending actions instead of the records
        #[arg(long)]
        pending: bool,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Erase all local records and queued actions
    Reset {
        /// Confirm the erase
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum BagCommand {
    /// Tag a new checked bag
    Add {
        #[command(flatten)]
        record: RecordArgs,

        /// Weight in kilograms
        #[arg(long, short)]
        weight: f64,

        #[arg(long, short, value_parser = non_empty_string)]
        color: String,
    },

    /// Remove a bag by tag number
    Remove {
        #[command(flatten)]
        record: RecordArgs,

        tag: String,
    },

    /// Mark a checked bag as loaded or offloaded
    Status {
        #[command(flatten)]
        record: RecordArgs,

        tag: String,

        #[arg(value_enum)]
        state: BagState,
    },
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// Delete synced actions
    Purge,
}
