// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:7070";
pub const DEFAULT_TERMINAL_URL: &str = "ws://127.0.0.1:7071";

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

pub fn gateway_url() -> String {
    var("CODEXI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
}

pub fn terminal_url() -> String {
    var("CODEXI_TERMINAL_URL").unwrap_or_else(|| DEFAULT_TERMINAL_URL.to_string())
}

pub fn auth_token() -> Option<String> {
    var("CODEXI_AUTH_TOKEN")
}

/// Vendor key fallback for `--api-key`.
pub fn api_key() -> Option<String> {
    var("CODEXI_API_KEY")
}

/// Same resolution order as the daemon.
pub fn state_dir() -> Option<PathBuf> {
    if let Some(dir) = var("CODEXI_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("codexi"));
    }
    var("HOME").map(|home| PathBuf::from(home).join(".local/state/codexi"))
}

pub fn cargo_manifest_dir() -> Option<String> {
    var("CARGO_MANIFEST_DIR")
}

/// Explicit daemon binary path.
pub fn daemon_binary() -> Option<PathBuf> {
    var("CODEXI_DAEMON_BIN").map(PathBuf::from)
}
