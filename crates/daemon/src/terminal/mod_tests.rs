// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use codexi_shell::AllowList;

use crate::test_helpers::{spawn_terminal, terminal_ctx};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}")).await.unwrap();
    ws
}

async fn send(ws: &mut Client, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

async fn recv(ws: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(10), ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn echo_scenario_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;
    let mut ws = connect(addr).await;

    send(
        &mut ws,
        json!({ "command": "echo", "args": ["hello"], "projectId": "p1", "sessionId": "s1" }),
    )
    .await;

    let session_dir = dir.path().join("codexi-session-s1");
    assert_eq!(
        recv(&mut ws).await,
        json!({
            "type": "command_result",
            "command": "echo hello",
            "stdout": "hello\n",
            "stderr": "",
            "exit_code": 0,
            "success": true,
            "cwd": session_dir.display().to_string(),
        })
    );
}

#[tokio::test]
async fn invalid_frame_gets_generic_error_and_connection_stays_open() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;
    let mut ws = connect(addr).await;
    let parse_error = json!({ "type": "error", "message": "Invalid command request" });

    ws.send(Message::Text("not json".into())).await.unwrap();
    assert_eq!(recv(&mut ws).await, parse_error);

    send(&mut ws, json!({ "args": ["missing command"] })).await;
    assert_eq!(recv(&mut ws).await, parse_error);

    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(recv(&mut ws).await, json!({ "type": "pong" }));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;
    let mut ws = connect(addr).await;

    send(
        &mut ws,
        json!({
            "command": "curl", "args": [], "projectId": "p1", "sessionId": "s1",
            "requestId": "r-42",
        }),
    )
    .await;

    assert_eq!(
        recv(&mut ws).await,
        json!({ "type": "error", "message": "command not allowed: curl", "request_id": "r-42" })
    );
}

#[tokio::test]
async fn close_session_removes_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;
    let mut ws = connect(addr).await;

    send(
        &mut ws,
        json!({ "command": "touch", "args": ["file"], "projectId": "p1", "sessionId": "s9" }),
    )
    .await;
    assert_eq!(recv(&mut ws).await["success"], true);
    let session_dir = dir.path().join("codexi-session-s9");
    assert!(session_dir.join("file").exists());

    send(&mut ws, json!({ "type": "close_session", "sessionId": "s9" })).await;
    assert_eq!(recv(&mut ws).await, json!({ "type": "session_closed", "session_id": "s9" }));
    assert!(!session_dir.exists());
}

#[tokio::test]
async fn results_within_a_session_follow_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;
    let mut ws = connect(addr).await;

    let req = |command: &str, args: Value, id: &str| {
        json!({
            "command": command, "args": args, "projectId": "p1", "sessionId": "s1",
            "requestId": id,
        })
    };
    send(&mut ws, req("sleep", json!(["0.3"]), "slow")).await;
    send(&mut ws, req("echo", json!(["fast"]), "fast")).await;

    assert_eq!(recv(&mut ws).await["request_id"], "slow");
    assert_eq!(recv(&mut ws).await["request_id"], "fast");
}

#[tokio::test]
async fn disconnect_cancels_in_flight_commands() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    let addr = spawn_terminal(ctx).await;

    let mut first = connect(addr).await;
    send(
        &mut first,
        json!({ "command": "sleep", "args": ["30"], "projectId": "p1", "sessionId": "s1" }),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    first.close(None).await.unwrap();
    drop(first);

    // The session queue is free again only if the sleep was killed.
    let mut second = connect(addr).await;
    send(
        &mut second,
        json!({ "command": "echo", "args": ["next"], "projectId": "p1", "sessionId": "s1" }),
    )
    .await;
    let reply = recv(&mut second).await;
    assert_eq!(reply["stdout"], "next\n");
}

#[tokio::test]
async fn token_is_required_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let (mut ctx, _store) = terminal_ctx(dir.path(), AllowList::default());
    ctx.auth_token = Some("s3cret".to_string());
    let addr = spawn_terminal(ctx).await;

    match tokio_tungstenite::connect_async(format!("ws://{addr}")).await {
        Err(tokio_tungstenite::tungstenite::Error::Http(resp)) => {
            assert_eq!(resp.status().as_u16(), 401)
        }
        Err(e) => panic!("expected HTTP 401, got {e}"),
        Ok(_) => panic!("unauthenticated connection was accepted"),
    }

    let (mut ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/?token=s3cret")).await.unwrap();
    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(recv(&mut ws).await, json!({ "type": "pong" }));

    let mut request = format!("ws://{addr}").into_client_request().unwrap();
    request.headers_mut().insert("authorization", "Bearer s3cret".parse().unwrap());
    let (mut ws, _) = tokio_tungstenite::connect_async(request).await.unwrap();
    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(recv(&mut ws).await, json!({ "type": "pong" }));
}
