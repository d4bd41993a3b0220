// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! [`ConnectivityMonitor`] holds the current online flag and tells
//! subscribers about transitions, never about repeated reports of the same
//! state. It does no health checking of its own: something else reports
//! link state to it. In watch mode that is [`watch_link`], which polls a
//! cheap transport-level [`LinkProbe`].

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Callback invoked with the new state on every transition.
pub type TransitionHandler = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`ConnectivityMonitor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Online/offline state with transition notification.
pub struct ConnectivityMonitor {
    online: AtomicBool,
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, TransitionHandler)>>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the state sampled at startup.
    pub fn new(initial: bool) -> Self {
        ConnectivityMonitor {
            online: AtomicBool::new(initial),
            next_id: AtomicU64::new(1),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Registers a transition handler. It is not called for the current
    /// state, only for later changes.
    pub fn subscribe(&self, handler: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.push((id, Arc::new(handler)));
        Subscription(id)
    }

    /// Removes a handler. Unknown subscriptions are ignored.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.retain(|(id, _)| *id != subscription.0);
    }

    /// Records the observed link state. Returns `true` and notifies
    /// subscribers when it differs from the previous state.
    pub fn report(&self, online: bool) -> bool {
        if self.online.swap(online, Ordering::SeqCst) == online {
            return false;
        }
        info!(online, "connectivity changed");

        let handlers: Vec<TransitionHandler> = {
            let guard = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
            guard.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in handlers {
            handler(online);
        }
        true
    }
}

/// A cheap reachability check of the remote target.
pub trait LinkProbe: Send + Sync {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Reachable when a TCP connection to the address opens in time.
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// `addr` is `host:port`.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        TcpProbe { addr: addr.into(), timeout }
    }

    /// Builds a probe for the host and port of an http(s) URL.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = reqwest::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let port = parsed.port_or_known_default()?;
        let addr = match host.parse::<std::net::IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, port).to_string(),
            Err(_) => format!("{host}:{port}"),
        };
        Some(TcpProbe::new(addr, timeout))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl LinkProbe for TcpProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            matches!(
                tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await,
                Ok(Ok(_))
            )
        })
    }
}

/// Reachable while a directory exists (the mount holding a direct table).
pub struct PathProbe {
    dir: PathBuf,
}

impl PathProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PathProbe { dir: dir.into() }
    }
}

impl LinkProbe for PathProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { tokio::fs::metadata(&self.dir).await.is_ok_and(|m| m.is_dir()) })
    }
}

/// Polls `probe` every `interval` and reports each result to `monitor`
/// until `cancel` fires.
pub async fn watch_link(
    probe: Arc<dyn LinkProbe>,
    monitor: Arc<ConnectivityMonitor>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }
        let online = tokio::select! {
            _ = cancel.cancelled() => return,
            online = probe.probe() => online,
        };
        debug!(online, "link probe");
        monitor.report(online);
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
