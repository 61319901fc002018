// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use codexi_core::SystemClock;
use codexi_storage::{ActivityLog, FileStore, MemoryStore, Store};
use fs2::FileExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Config, DaemonState, LifecycleError, StoreKind};
use crate::session::SessionRegistry;

/// Result of daemon startup
pub struct StartupResult {
    pub daemon: DaemonState,
    /// WebSocket Command Channel listener
    pub terminal: TcpListener,
    /// HTTP gateway listener
    pub gateway: TcpListener,
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock —
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory (needed for lock, log, store)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Open the activity store
    let store: Arc<dyn Store> = match config.store {
        StoreKind::File => {
            let store = FileStore::open(&config.store_path)?;
            info!(path = %store.path().display(), "opened file store");
            Arc::new(store)
        }
        StoreKind::Memory => {
            info!("using in-memory store; activity is not persisted");
            Arc::new(MemoryStore::new())
        }
    };
    let activity = ActivityLog::new(store);

    // 4. Session registry
    std::fs::create_dir_all(&config.session_root)?;
    let sessions = Arc::new(SessionRegistry::new(
        config.session_root.clone(),
        config.session_ttl,
        config.max_concurrent,
        SystemClock,
    ));
    match sessions.adopt_existing() {
        Ok(adopted) => debug!(adopted, root = %config.session_root.display(), "session scan"),
        Err(e) => warn!(root = %config.session_root.display(), error = %e, "session scan failed"),
    }

    // 5. Bind listeners (LAST - only after all validation passes)
    let terminal = TcpListener::bind(config.terminal_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.terminal_addr, e))?;
    let gateway = TcpListener::bind(config.gateway_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.gateway_addr, e))?;

    info!(
        terminal = %terminal.local_addr()?,
        gateway = %gateway.local_addr()?,
        "Daemon started",
    );

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            sessions,
            activity,
            start_time: Instant::now(),
            shutdown: CancellationToken::new(),
        },
        terminal,
        gateway,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
