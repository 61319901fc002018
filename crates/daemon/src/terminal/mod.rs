// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Channel listener.
//!
//! Each WebSocket connection carries JSON Command Requests in and Command
//! Results or Errors out, one JSON object per text frame. Requests are
//! executed concurrently; within a session they run in arrival order.

mod connection;
mod dispatch;

use std::sync::Arc;

use codexi_shell::CommandExecutor;
use codexi_storage::ActivityLog;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::session::SessionRegistry;

/// Shared context for all terminal connections.
pub struct TerminalCtx {
    pub sessions: Arc<SessionRegistry>,
    pub executor: CommandExecutor,
    pub activity: ActivityLog,
    /// When set, the WebSocket upgrade must present this bearer token.
    pub auth_token: Option<String>,
    /// Stops the accept loop and cancels every connection.
    pub shutdown: CancellationToken,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("WebSocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("WebSocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Accept loop for the Command Channel.
pub struct TerminalListener {
    tcp: TcpListener,
    ctx: Arc<TerminalCtx>,
}

impl TerminalListener {
    pub fn new(tcp: TcpListener, ctx: Arc<TerminalCtx>) -> Self {
        Self { tcp, ctx }
    }

    /// Run until shutdown, spawning a task per connection.
    pub async fn run(self) {
        if let Ok(addr) = self.tcp.local_addr() {
            info!(%addr, "terminal listener ready");
        }
        loop {
            let accepted = tokio::select! {
                result = self.tcp.accept() => result,
                _ = self.ctx.shutdown.cancelled() => break,
            };
            match accepted {
                Ok((stream, peer)) => {
                    debug!(%peer, "terminal connection");
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = connection::handle_connection(stream, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("terminal accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    use tokio_tungstenite::tungstenite::Error as WsError;
    match e {
        ConnectionError::Socket(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
            debug!("client disconnected")
        }
        ConnectionError::Handshake(_) => warn!("{}", e),
        _ => error!("connection error: {}", e),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
