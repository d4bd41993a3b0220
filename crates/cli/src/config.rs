// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Desk configuration management.
//!
//! Configuration is stored in `.skydesk/config.toml` and includes:
//! - `desk_id`: identifier stamped on every record this desk mutates
//! - `[remote]`: where records are written (gateway URL or direct table)
//! - `[sync]`: sync cadence, retry cap, and connectivity probing

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".skydesk";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "checkins.db";
const LOG_FILE_NAME: &str = "watch.log";
const SYNC_LOCK_FILE_NAME: &str = "sync.lock";

pub const DEFAULT_DESK_ID: &str = "HKG-F32";

/// Desk configuration stored in `.skydesk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Desk identifier recorded on mutations.
    #[serde(default = "default_desk_id")]
    pub desk_id: String,
    /// Remote target. Absent means local-only: actions queue but never sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_desk_id() -> String {
    DEFAULT_DESK_ID.to_string()
}

/// Remote target configuration.
///
/// Exactly one strategy is used. When both keys are set, `direct_table`
/// wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the gateway, e.g. `http://127.0.0.1:7890`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    /// Path of the remote table file for direct writes. Relative paths
    /// resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_table: Option<String>,
}

/// The remote strategy selected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Direct(PathBuf),
    Gateway(String),
}

impl RemoteConfig {
    /// Resolves the configured strategy, or `None` when neither key is set.
    pub fn target(&self, work_dir: &Path) -> Option<RemoteTarget> {
        if let Some(table) = &self.direct_table {
            let path = Path::new(table);
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                work_dir.parent().unwrap_or(work_dir).join(path)
            };
            return Some(RemoteTarget::Direct(resolved));
        }
        self.gateway_url.as_ref().map(|url| RemoteTarget::Gateway(url.trim_end_matches('/').to_string()))
    }

    /// Validates the gateway URL scheme.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate(&self) -> Option<String> {
        match &self.gateway_url {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Some(
                format!("invalid gateway URL '{url}': must start with http:// or https://"),
            ),
            _ => None,
        }
    }
}

/// Sync cadence and connectivity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between scheduled sync cycles while online (default: 30).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Failed attempts before an action is given up (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Upper bound on one remote write, in seconds (default: 15).
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
    /// Seconds between link probes in watch mode (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Max time one link probe may take, in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_remote_timeout_secs() -> u64 {
    15
}

fn default_probe_interval_secs() -> u64 {
    5
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval_secs: default_interval_secs(),
            max_retries: default_max_retries(),
            remote_timeout_secs: default_remote_timeout_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs.max(1))
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.max(1))
    }
}

impl Config {
    /// Creates a local-only config for the given desk.
    pub fn new(desk_id: String) -> Result<Self> {
        if desk_id.trim().is_empty() {
            return Err(Error::InvalidDeskId);
        }
        Ok(Config { desk_id, remote: None, sync: SyncConfig::default() })
    }

    /// Loads configuration from the given `.skydesk/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.as_ref().and_then(RemoteConfig::validate) {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.skydesk/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// The remote strategy, if one is configured.
    pub fn remote_target(&self, work_dir: &Path) -> Option<RemoteTarget> {
        self.remote.as_ref().and_then(|r| r.target(work_dir))
    }
}

/// Find the .skydesk directory.
///
/// `SKYDESK_DIR` wins when set; otherwise walks up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    if let Some(dir) = crate::env::desk_dir() {
        if dir.is_dir() {
            return Ok(dir);
        }
        return Err(Error::NotInitialized);
    }

    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Path of the local database.
pub fn get_db_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DB_FILE_NAME)
}

/// Path of the lock file that keeps sync cycles from overlapping.
pub fn get_sync_lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join(SYNC_LOCK_FILE_NAME)
}

/// Path of the watch-mode log file.
pub fn get_log_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOG_FILE_NAME)
}

/// Initialize a new .skydesk directory at the given path.
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
