// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! codexid: terminal listener and vendor gateway daemon.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use codexi_adapters::{Gateway, ReqwestTransport};
use codexi_daemon::env::VERSION;
use codexi_daemon::gateway::{self, GatewayState};
use codexi_daemon::lifecycle::{self, Config, LifecycleError, StartupResult};
use codexi_daemon::logging::{self, LogTarget};
use codexi_daemon::terminal::{TerminalCtx, TerminalListener};
use codexi_shell::CommandExecutor;
use tracing::{error, info};

struct Args {
    foreground: bool,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args { foreground: false };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--foreground" | "-f" => args.foreground = true,
            "--version" | "-V" => {
                println!("codexid {VERSION}");
                return Ok(None);
            }
            "--help" | "-h" => {
                println!("Usage: codexid [--foreground] [--version]");
                return Ok(None);
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    Ok(Some(args))
}

/// The launching CLI may have closed our stderr already.
fn report(msg: &dyn std::fmt::Display) {
    let _ = writeln!(std::io::stderr(), "codexid: {msg}");
}

/// Marker line the CLI scans for when a background start fails.
fn write_startup_marker(config: &Config) {
    if let Some(dir) = config.log_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    if let Ok(mut file) =
        std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)
    {
        let _ = writeln!(file, "--- codexid: starting (pid: {}) ---\n", std::process::id());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            report(&msg);
            return ExitCode::from(2);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    let target = LogTarget::resolve(args.foreground);
    if target == LogTarget::File {
        write_startup_marker(&config);
    }
    let _guard = match logging::init(target, &config.log_path) {
        Ok(guard) => guard,
        Err(e) => {
            report(&format!("failed to open log: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    let transport = ReqwestTransport::new(config.vendor_timeout)?;
    let StartupResult { mut daemon, terminal, gateway: gateway_tcp } =
        lifecycle::startup(&config).await?;

    let terminal_addr = terminal.local_addr()?;
    let gateway_addr = gateway_tcp.local_addr()?;

    let ctx = Arc::new(TerminalCtx {
        sessions: Arc::clone(&daemon.sessions),
        executor: CommandExecutor::new(config.exec_policy()),
        activity: daemon.activity.clone(),
        auth_token: config.auth_token.clone(),
        shutdown: daemon.shutdown.clone(),
    });
    let state = Arc::new(GatewayState {
        gateway: Gateway::new(transport),
        activity: daemon.activity.clone(),
        auth_token: config.auth_token.clone(),
    });

    let terminal_task = tokio::spawn(TerminalListener::new(terminal, ctx).run());
    let gateway_task =
        tokio::spawn(gateway::serve(gateway_tcp, state, daemon.shutdown.clone()));
    let sweeper =
        daemon.sessions.spawn_sweeper(config.sweep_interval, daemon.shutdown.clone());

    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "READY terminal={terminal_addr} gateway={gateway_addr}");
    let _ = stdout.flush();

    wait_for_signal().await;
    info!("Shutdown signal received");

    daemon.shutdown()?;
    let _ = tokio::join!(terminal_task, gateway_task, sweeper);
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            error!("failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
