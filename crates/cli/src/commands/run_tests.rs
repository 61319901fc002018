// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;
use yare::parameterized;

use super::*;

fn args(command: &[&str]) -> RunArgs {
    RunArgs {
        session: "s1".to_string(),
        project: "p1".to_string(),
        cwd: Some("src".to_string()),
        close: false,
        command: command.iter().map(|s| s.to_string()).collect(),
    }
}

fn result(exit_code: i32, success: bool) -> CommandResult {
    CommandResult {
        request_id: None,
        command: "x".into(),
        stdout: String::new(),
        stderr: String::new(),
        exit_code,
        success,
        cwd: "/tmp".into(),
        timed_out: false,
        truncated: false,
    }
}

/// Terminal stub: answers every command frame with `exit_code`, echoing its
/// request id, and returns the frames it saw.
async fn stub_terminal(exit_code: i32) -> (String, tokio::task::JoinHandle<Vec<Value>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let mut seen = Vec::new();
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let frame: Value = serde_json::from_str(text.as_str()).unwrap();
            let reply = if frame["type"] == "close_session" {
                json!({ "type": "session_closed", "session_id": frame["sessionId"] })
            } else {
                json!({
                    "type": "command_result",
                    "request_id": frame["requestId"],
                    "command": "echo hi",
                    "stdout": "hi\n",
                    "stderr": "",
                    "exit_code": exit_code,
                    "success": exit_code == 0,
                    "cwd": "/tmp/codexi-session-s1/src",
                })
            };
            seen.push(frame);
            ws.send(Message::Text(reply.to_string().into())).await.unwrap();
        }
        seen
    });
    (format!("ws://{addr}"), handle)
}

#[test]
fn request_splits_command_and_args() {
    let request = args(&["ls", "-la", "--color"]).request().unwrap();
    assert_eq!(request.command, "ls");
    assert_eq!(request.args, vec!["-la", "--color"]);
    assert_eq!(request.session_id, "s1");
    assert_eq!(request.cwd.as_deref(), Some("src"));
    assert!(request.request_id.is_some());
}

#[test]
fn empty_command_has_no_request() {
    assert!(args(&[]).request().is_none());
}

#[parameterized(
    success = { 0, true, 0 },
    failure = { 2, false, 2 },
    timeout = { 124, false, 124 },
    signal = { -1, false, 1 },
    out_of_range = { 300, false, 1 },
    zero_but_failed = { 0, false, 1 },
)]
fn exit_code_mirrors_remote(code: i32, success: bool, expected: i32) {
    assert_eq!(exit_code(&result(code, success)), expected);
}

#[tokio::test]
async fn run_sends_request_and_closes_session() {
    let (url, seen) = stub_terminal(0).await;
    let mut run_args = args(&["echo", "hi"]);
    run_args.close = true;

    handle(run_args, &url, None, OutputFormat::Json).await.unwrap();

    let frames = seen.await.unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["command"], "echo");
    assert_eq!(frames[0]["projectId"], "p1");
    assert!(frames[0]["requestId"].is_string());
    assert_eq!(frames[1], json!({ "type": "close_session", "sessionId": "s1" }));
}

#[tokio::test]
async fn remote_failure_sets_exit_code() {
    let (url, _seen) = stub_terminal(3).await;

    let err = handle(args(&["false"]), &url, None, OutputFormat::Json).await.unwrap_err();

    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, 3);
    assert!(exit.message.is_empty());
}
