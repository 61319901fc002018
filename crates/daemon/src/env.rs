// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Daemon version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: CODEXI_STATE_DIR > XDG_STATE_HOME/codexi > ~/.local/state/codexi
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CODEXI_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("codexi"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/codexi"))
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    var(name).and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

fn secs(name: &str) -> Option<Duration> {
    var(name).and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}

pub fn terminal_addr() -> Option<SocketAddr> {
    var("CODEXI_TERMINAL_ADDR").and_then(|s| s.parse().ok())
}

pub fn gateway_addr() -> Option<SocketAddr> {
    var("CODEXI_GATEWAY_ADDR").and_then(|s| s.parse().ok())
}

/// Shared bearer token for both listeners.
pub fn auth_token() -> Option<String> {
    var("CODEXI_AUTH_TOKEN")
}

/// Parent directory of per-session working directories.
pub fn session_root() -> Option<PathBuf> {
    var("CODEXI_SESSION_ROOT").map(PathBuf::from)
}

pub fn session_ttl() -> Option<Duration> {
    secs("CODEXI_SESSION_TTL_SECS")
}

pub fn sweep_interval() -> Option<Duration> {
    secs("CODEXI_SWEEP_INTERVAL_SECS")
}

pub fn command_timeout() -> Option<Duration> {
    millis("CODEXI_COMMAND_TIMEOUT_MS")
}

pub fn output_cap() -> Option<usize> {
    var("CODEXI_OUTPUT_CAP_BYTES").and_then(|s| s.parse().ok())
}

pub fn max_concurrent() -> Option<usize> {
    var("CODEXI_MAX_CONCURRENT").and_then(|s| s.parse().ok()).filter(|n| *n > 0)
}

/// Comma-separated command names; `*` allows any.
pub fn allowed_commands() -> Option<Vec<String>> {
    var("CODEXI_ALLOWED_COMMANDS").map(|s| s.split(',').map(|n| n.trim().to_string()).collect())
}

pub fn vendor_timeout() -> Option<Duration> {
    millis("CODEXI_VENDOR_TIMEOUT_MS")
}

/// `file` or `memory`
pub fn store_kind() -> Option<String> {
    var("CODEXI_STORE")
}

/// Log filter: CODEXI_LOG > RUST_LOG
pub fn log_filter() -> Option<String> {
    var("CODEXI_LOG").or_else(|| var("RUST_LOG"))
}

/// Log to stderr instead of `daemon.log`.
pub fn log_stderr() -> bool {
    matches!(var("CODEXI_LOG_STDERR").as_deref(), Some("1") | Some("true"))
}
