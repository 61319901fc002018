// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the daemon crate.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use codexi_adapters::{FakeTransport, Gateway};
use codexi_core::SystemClock;
use codexi_shell::{AllowList, CommandExecutor, ExecPolicy};
use codexi_storage::{ActivityLog, MemoryStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::gateway::{self, GatewayState};
use crate::session::SessionRegistry;
use crate::terminal::{TerminalCtx, TerminalListener};

/// Terminal context rooted at `root`, logging into the returned store.
pub(crate) fn terminal_ctx(root: &Path, allow: AllowList) -> (TerminalCtx, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let sessions = Arc::new(SessionRegistry::new(
        root.to_path_buf(),
        Duration::from_secs(3600),
        8,
        SystemClock,
    ));
    let mut policy = ExecPolicy::default().with_allow(allow);
    policy.drain_grace = Duration::from_millis(200);
    let ctx = TerminalCtx {
        sessions,
        executor: CommandExecutor::new(policy),
        activity: ActivityLog::new(store.clone()),
        auth_token: None,
        shutdown: CancellationToken::new(),
    };
    (ctx, store)
}

/// Serve `ctx` on an ephemeral loopback port.
pub(crate) async fn spawn_terminal(ctx: TerminalCtx) -> SocketAddr {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    tokio::spawn(TerminalListener::new(tcp, Arc::new(ctx)).run());
    addr
}

/// Gateway backed by a scripted transport, served on an ephemeral port.
pub(crate) struct TestGateway {
    pub addr: SocketAddr,
    pub transport: FakeTransport,
    pub store: Arc<MemoryStore>,
    pub shutdown: CancellationToken,
}

impl TestGateway {
    pub async fn start(auth_token: Option<&str>) -> Self {
        let transport = FakeTransport::new();
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(GatewayState {
            gateway: Gateway::new(transport.clone()),
            activity: ActivityLog::new(store.clone()),
            auth_token: auth_token.map(str::to_string),
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        tokio::spawn(gateway::serve(listener, state, shutdown.clone()));
        Self { addr, transport, store, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
