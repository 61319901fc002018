// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: defaults, then `config.toml`, then environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use codexi_shell::{AllowList, ExecPolicy};
use serde::Deserialize;

use super::LifecycleError;
use crate::env;

/// Backing store for the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    File,
    Memory,
}

impl StoreKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(StoreKind::File),
            "memory" => Some(StoreKind::Memory),
            _ => None,
        }
    }
}

/// Optional settings read from `<state_dir>/config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub terminal_addr: Option<SocketAddr>,
    pub gateway_addr: Option<SocketAddr>,
    pub auth_token: Option<String>,
    pub session_root: Option<PathBuf>,
    pub session_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
    pub command_timeout_ms: Option<u64>,
    pub output_cap_bytes: Option<usize>,
    pub max_concurrent: Option<usize>,
    pub allowed_commands: Option<Vec<String>>,
    pub vendor_timeout_ms: Option<u64>,
    pub store: Option<StoreKind>,
}

impl FileConfig {
    /// Read the file if present.
    pub fn read(path: &Path) -> Result<Option<Self>, LifecycleError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|e| LifecycleError::Config(path.to_path_buf(), e.to_string()))
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/codexi)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the file-backed store
    pub store_path: PathBuf,
    pub terminal_addr: SocketAddr,
    pub gateway_addr: SocketAddr,
    pub auth_token: Option<String>,
    /// Parent of `codexi-session-<id>` directories
    pub session_root: PathBuf,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
    pub command_timeout: Duration,
    pub output_cap: usize,
    pub max_concurrent: usize,
    pub allowed: AllowList,
    pub vendor_timeout: Duration,
    pub store: StoreKind,
}

impl Config {
    /// Built-in defaults rooted at `state_dir`; reads nothing.
    pub fn defaults(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            store_path: state_dir.join("store.json"),
            terminal_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 7071)),
            gateway_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 7070)),
            auth_token: None,
            session_root: std::env::temp_dir(),
            session_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
            command_timeout: Duration::from_secs(30),
            output_cap: 1024 * 1024,
            max_concurrent: 16,
            allowed: AllowList::default(),
            vendor_timeout: Duration::from_secs(60),
            store: StoreKind::File,
            state_dir,
        }
    }

    /// Load configuration for the user-level daemon.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let mut config = Self::defaults(&state_dir);
        if let Some(file) = FileConfig::read(&state_dir.join("config.toml"))? {
            config.apply_file(file);
        }
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        let FileConfig {
            terminal_addr,
            gateway_addr,
            auth_token,
            session_root,
            session_ttl_secs,
            sweep_interval_secs,
            command_timeout_ms,
            output_cap_bytes,
            max_concurrent,
            allowed_commands,
            vendor_timeout_ms,
            store,
        } = file;
        set(&mut self.terminal_addr, terminal_addr);
        set(&mut self.gateway_addr, gateway_addr);
        if auth_token.is_some() {
            self.auth_token = auth_token;
        }
        set(&mut self.session_root, session_root);
        set(&mut self.session_ttl, session_ttl_secs.map(Duration::from_secs));
        set(&mut self.sweep_interval, sweep_interval_secs.map(Duration::from_secs));
        set(&mut self.command_timeout, command_timeout_ms.map(Duration::from_millis));
        set(&mut self.output_cap, output_cap_bytes);
        set(&mut self.max_concurrent, max_concurrent.filter(|n| *n > 0));
        set(&mut self.allowed, allowed_commands.map(AllowList::from_names));
        set(&mut self.vendor_timeout, vendor_timeout_ms.map(Duration::from_millis));
        set(&mut self.store, store);
    }

    /// Environment wins over the file; unparseable values are ignored.
    pub fn apply_env(&mut self) {
        set(&mut self.terminal_addr, env::terminal_addr());
        set(&mut self.gateway_addr, env::gateway_addr());
        if let Some(token) = env::auth_token() {
            self.auth_token = Some(token);
        }
        set(&mut self.session_root, env::session_root());
        set(&mut self.session_ttl, env::session_ttl());
        set(&mut self.sweep_interval, env::sweep_interval());
        set(&mut self.command_timeout, env::command_timeout());
        set(&mut self.output_cap, env::output_cap());
        set(&mut self.max_concurrent, env::max_concurrent());
        set(&mut self.allowed, env::allowed_commands().map(AllowList::from_names));
        set(&mut self.vendor_timeout, env::vendor_timeout());
        set(&mut self.store, env::store_kind().as_deref().and_then(StoreKind::parse));
    }

    /// Refuse to expose an unauthenticated listener beyond loopback.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.auth_token.is_none() {
            for addr in [self.terminal_addr, self.gateway_addr] {
                if !addr.ip().is_loopback() {
                    return Err(LifecycleError::AuthRequired(addr));
                }
            }
        }
        Ok(())
    }

    pub fn exec_policy(&self) -> ExecPolicy {
        ExecPolicy::default()
            .with_allow(self.allowed.clone())
            .with_timeout(self.command_timeout)
            .with_output_cap(self.output_cap)
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
