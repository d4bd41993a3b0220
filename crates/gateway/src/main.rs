// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sd-gateway: HTTP gateway in front of the shared check-in table.
//!
//! Desks configured with a `gateway_url` sync through this server instead of
//! writing the table directly.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// sd-gateway: check-in sync gateway
#[derive(Parser, Debug)]
#[command(name = "sd-gateway")]
#[command(about = "HTTP gateway in front of the shared check-in table")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory holding the remote table
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting sd-gateway");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::AppState::open(&args.data)?;
    server::run(args.bind, state).await?;

    Ok(())
}
