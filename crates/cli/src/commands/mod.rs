// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod bag;
pub mod checkin;
pub mod export;
pub mod import;
pub mod init;
pub mod lookup;
pub mod queue;
pub mod reset;
pub mod sync;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use sd_core::{LocalStore, SqliteStore};

use crate::config::{find_work_dir, get_db_path, get_sync_lock_path, Config, RemoteTarget};
use crate::desk::DeskService;
use crate::error::{Error, Result};
use crate::sync::{
    ConnectivityMonitor, DirectAdapter, GatewayAdapter, LinkProbe, PathProbe, RemoteAdapter,
    SyncEngine, SyncPolicy, SyncService, TcpProbe,
};

/// An opened desk: its `.skydesk/` directory, config, and local store.
pub struct Desk {
    pub work_dir: PathBuf,
    pub config: Config,
    pub store: Arc<SqliteStore>,
}

impl Desk {
    /// Desk id for mutations: `SKYDESK_DESK_ID` overrides the config.
    pub fn desk_id(&self) -> String {
        crate::env::desk_id().unwrap_or_else(|| self.config.desk_id.clone())
    }

    pub fn service(&self) -> Result<DeskService> {
        let store: Arc<dyn LocalStore> = self.store.clone();
        DeskService::new(store, self.desk_id())
    }

    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            max_retries: self.config.sync.max_retries,
            remote_timeout: self.config.sync.remote_timeout(),
        }
    }

    pub fn remote_target(&self) -> Option<RemoteTarget> {
        self.config.remote_target(&self.work_dir)
    }

    /// Sync service over this desk's store. Cycles are serialized through
    /// `.skydesk/sync.lock` with any other skydesk process on the desk.
    pub fn sync_service(
        &self,
        adapter: Arc<dyn RemoteAdapter>,
        monitor: Arc<ConnectivityMonitor>,
    ) -> SyncService {
        let engine =
            SyncEngine::new(self.store.clone(), adapter, Arc::clone(&monitor), self.policy())
                .with_cycle_lock(get_sync_lock_path(&self.work_dir));
        SyncService::with_engine(engine, monitor, self.config.sync.interval())
    }
}

/// Helper to open the desk from the current context.
pub fn open_desk() -> Result<Desk> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let store = Arc::new(SqliteStore::new(&get_db_path(&work_dir)));
    store.init()?;
    Ok(Desk { work_dir, config, store })
}

/// Builds the adapter for the configured strategy.
pub fn build_adapter(desk: &Desk, target: &RemoteTarget) -> Result<Arc<dyn RemoteAdapter>> {
    let adapter: Arc<dyn RemoteAdapter> = match target {
        RemoteTarget::Direct(path) => Arc::new(DirectAdapter::open(path)?),
        RemoteTarget::Gateway(url) => {
            Arc::new(GatewayAdapter::new(url, desk.config.sync.remote_timeout())?)
        }
    };
    Ok(adapter)
}

/// Builds the transport-level link probe for the configured strategy.
pub fn build_probe(desk: &Desk, target: &RemoteTarget) -> Result<Arc<dyn LinkProbe>> {
    let probe: Arc<dyn LinkProbe> = match target {
        RemoteTarget::Direct(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            Arc::new(PathProbe::new(dir))
        }
        RemoteTarget::Gateway(url) => {
            let probe = TcpProbe::for_url(url, desk.config.sync.probe_timeout())
                .ok_or_else(|| Error::Config(format!("gateway URL '{url}' has no host")))?;
            Arc::new(probe)
        }
    };
    Ok(probe)
}
