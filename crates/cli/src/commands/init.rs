// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use sd_core::{LocalStore, SqliteStore};

use crate::config::{get_db_path, init_work_dir, Config, RemoteConfig, RemoteTarget, DEFAULT_DESK_ID};
use crate::error::{Error, Result};

pub fn run(
    desk_id: Option<String>,
    gateway: Option<String>,
    direct: Option<String>,
    path: Option<String>,
) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let config = build_config(desk_id, gateway, direct)?;
    let work_dir = init_work_dir(&target_path, &config)?;

    let store = SqliteStore::new(&get_db_path(&work_dir));
    store.init()?;

    println!("Initialized desk at {}", work_dir.display());
    println!("Desk: {}", config.desk_id);
    match config.remote_target(&work_dir) {
        Some(target) => println!("Remote: {}", describe_target(&target)),
        None => println!("Remote: none (actions queue locally)"),
    }

    Ok(())
}

/// Builds the initial config from the init flags.
pub(crate) fn build_config(
    desk_id: Option<String>,
    gateway: Option<String>,
    direct: Option<String>,
) -> Result<Config> {
    let desk_id = desk_id
        .or_else(crate::env::desk_id)
        .unwrap_or_else(|| DEFAULT_DESK_ID.to_string());
    let mut config = Config::new(desk_id)?;

    if gateway.is_some() || direct.is_some() {
        let remote = RemoteConfig { gateway_url: gateway, direct_table: direct };
        if let Some(msg) = remote.validate() {
            return Err(Error::Config(msg));
        }
        config.remote = Some(remote);
    }

    Ok(config)
}

pub(crate) fn describe_target(target: &RemoteTarget) -> String {
    match target {
        RemoteTarget::Direct(path) => format!("direct table {}", path.display()),
        RemoteTarget::Gateway(url) => format!("gateway {url}"),
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
