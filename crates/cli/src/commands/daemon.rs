// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `codexi daemon` - Daemon management commands

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::output::{format_or_json, OutputFormat};

const READY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (foreground or background)
    Start {
        /// Run in foreground, logging to stderr
        #[arg(long)]
        foreground: bool,
    },
    /// Check whether the gateway answers
    Status,
}

pub async fn daemon(args: DaemonArgs, gateway_url: &str, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start { foreground } => start(foreground, format).await,
        DaemonCommand::Status => status(gateway_url, format).await,
    }
}

/// Addresses from the daemon's `READY terminal=... gateway=...` line.
#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub(crate) struct Ready {
    pub terminal: String,
    pub gateway: String,
}

pub(crate) fn parse_ready(line: &str) -> Option<Ready> {
    let rest = line.trim().strip_prefix("READY ")?;
    let mut terminal = None;
    let mut gateway = None;
    for field in rest.split_whitespace() {
        match field.split_once('=') {
            Some(("terminal", addr)) => terminal = Some(addr.to_string()),
            Some(("gateway", addr)) => gateway = Some(addr.to_string()),
            _ => {}
        }
    }
    Some(Ready { terminal: terminal?, gateway: gateway? })
}

async fn start(foreground: bool, format: OutputFormat) -> Result<()> {
    let codexid = find_codexid_binary();
    if foreground {
        let status = Command::new(&codexid).arg("--foreground").status().await?;
        if !status.success() {
            return Err(anyhow!("Daemon exited with status: {}", status));
        }
        return Ok(());
    }

    let mut child = Command::new(&codexid)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow!("failed to launch {}: {}", codexid.display(), e))?;

    let stdout = child.stdout.take().ok_or_else(|| anyhow!("daemon stdout unavailable"))?;
    let mut lines = BufReader::new(stdout).lines();
    let first = tokio::time::timeout(READY_TIMEOUT, lines.next_line())
        .await
        .map_err(|_| anyhow!("daemon did not report ready within {:?}", READY_TIMEOUT))??;

    if let Some(ready) = first.as_deref().and_then(parse_ready) {
        return format_or_json(format, &ready, || {
            println!(
                "Daemon started (terminal {}, gateway {})",
                crate::color::header(&ready.terminal),
                crate::color::header(&ready.gateway)
            )
        });
    }

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr).await;
    }
    let logged = log_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|log| parse_startup_error(&log));
    let reason = logged
        .or_else(|| Some(stderr.trim().trim_start_matches("codexid: ").to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "daemon exited before it was ready".to_string());
    Err(anyhow!("Failed to start daemon: {}", reason))
}

async fn status(gateway_url: &str, format: OutputFormat) -> Result<()> {
    let url = format!("{}/health", gateway_url.trim_end_matches('/'));
    let health = match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => resp.json::<serde_json::Value>().await.ok(),
        _ => None,
    };
    match health {
        Some(body) => {
            let version = body["version"].as_str().unwrap_or("unknown").to_string();
            let obj = serde_json::json!({ "status": "running", "version": version });
            format_or_json(format, &obj, || {
                println!("Status: running");
                println!("Version: {}", version);
            })
        }
        None => {
            let obj = serde_json::json!({ "status": "not_running" });
            format_or_json(format, &obj, || println!("Daemon not running"))
        }
    }
}

/// Error text from the most recent startup recorded in `daemon.log`.
pub(crate) fn parse_startup_error(log: &str) -> Option<String> {
    const MARKER: &str = "--- codexid: starting";
    const FAILED: &str = "Failed to start daemon: ";

    let last_start = log.rfind(MARKER)?;
    log[last_start..].lines().find_map(|line| {
        line.find(FAILED).map(|at| line[at + FAILED.len()..].trim().to_string())
    })
}

fn log_path() -> Option<PathBuf> {
    crate::env::state_dir().map(|dir| dir.join("daemon.log"))
}

fn find_codexid_binary() -> PathBuf {
    if let Some(path) = crate::env::daemon_binary() {
        return path;
    }

    let current_exe = std::env::current_exe().ok();

    // Dev builds prefer the workspace's debug daemon.
    let is_debug_build = current_exe
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.contains("target/debug"))
        .unwrap_or(false);
    if is_debug_build {
        if let Some(manifest_dir) = crate::env::cargo_manifest_dir() {
            let dev_path = PathBuf::from(manifest_dir)
                .parent()
                .and_then(|p| p.parent())
                .map(|p| p.join("target/debug/codexid"));
            if let Some(path) = dev_path.filter(|p| p.exists()) {
                return path;
            }
        }
    }

    if let Some(dir) = current_exe.as_ref().and_then(|exe| exe.parent()) {
        let sibling = dir.join("codexid");
        if sibling.exists() {
            return sibling;
        }
    }

    PathBuf::from("codexid")
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
