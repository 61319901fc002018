// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

mod config;
mod startup;

pub use config::{Config, FileConfig, StoreKind};
pub use startup::{startup, StartupResult};

use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use codexi_adapters::TransportError;
use codexi_storage::{ActivityLog, StoreError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::session::SessionRegistry;

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub sessions: Arc<SessionRegistry>,
    pub activity: ActivityLog,
    pub start_time: Instant,
    /// Cancelled on shutdown; stops listeners and the sweeper.
    pub shutdown: CancellationToken,
}

impl DaemonState {
    /// Shutdown the daemon gracefully.
    ///
    /// Session directories are left in place; the next daemon adopts them
    /// at startup and sweeps them once idle past the TTL.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        self.shutdown.cancel();

        if let Err(e) = self.activity.flush() {
            warn!("Failed to flush activity store on shutdown: {}", e);
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!(uptime_secs = self.start_time.elapsed().as_secs(), "Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("CODEXI_AUTH_TOKEN is required when listening on non-loopback address {0}")]
    AuthRequired(SocketAddr),

    #[error("Invalid config file {0}: {1}")]
    Config(PathBuf, String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Vendor transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
