// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One Command Channel connection.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{header, StatusCode};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use codexi_wire::{ClientMessage, ControlMessage, ServerMessage, GENERIC_PARSE_ERROR};

use super::dispatch;
use super::{ConnectionError, TerminalCtx};
use crate::auth;

/// Outbound frames buffered per connection
const OUTBOUND_CAPACITY: usize = 256;

/// Serve one client until it disconnects or the daemon shuts down.
///
/// Commands still running when the connection ends are cancelled.
pub(super) async fn handle_connection(
    stream: TcpStream,
    ctx: &TerminalCtx,
) -> Result<(), ConnectionError> {
    let expected = ctx.auth_token.clone();
    let ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| {
        check_auth(req, expected.as_deref()).map(|()| resp)
    })
    .await
    .map_err(ConnectionError::Handshake)?;

    let (mut sink, mut source) = ws.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match codexi_wire::encode(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "failed to encode outbound frame");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let cancel = ctx.shutdown.child_token();
    let mut tasks = JoinSet::new();
    let mut outcome = Ok(());

    loop {
        let frame = tokio::select! {
            frame = source.next() => frame,
            _ = cancel.cancelled() => None,
        };
        let Some(frame) = frame else { break };

        match frame {
            Ok(Message::Text(text)) => match ClientMessage::decode(text.as_str()) {
                Ok(ClientMessage::Command(request)) => {
                    // Queue position is taken here, in arrival order.
                    match dispatch::prepare(ctx, request) {
                        Ok(prepared) => {
                            let executor = ctx.executor.clone();
                            let activity = ctx.activity.clone();
                            let tx = tx.clone();
                            let cancel = cancel.clone();
                            tasks.spawn(async move {
                                let reply =
                                    dispatch::execute(&executor, &activity, prepared, &cancel)
                                        .await;
                                let _ = tx.send(reply).await;
                            });
                        }
                        Err(reply) => {
                            let _ = tx.send(reply).await;
                        }
                    }
                }
                Ok(ClientMessage::Control(ControlMessage::Ping)) => {
                    let _ = tx.send(ServerMessage::Pong).await;
                }
                Ok(ClientMessage::Control(ControlMessage::CloseSession { session_id })) => {
                    let reply = match ctx.sessions.close(&session_id).await {
                        Ok(()) => ServerMessage::SessionClosed { session_id },
                        Err(e) => ServerMessage::error(e.to_string(), None),
                    };
                    let _ = tx.send(reply).await;
                }
                Err(e) => {
                    debug!(error = %e, "rejected inbound frame");
                    let _ = tx.send(ServerMessage::error(GENERIC_PARSE_ERROR, None)).await;
                }
            },
            Ok(Message::Binary(_)) => {
                let _ = tx.send(ServerMessage::error(GENERIC_PARSE_ERROR, None)).await;
            }
            Ok(Message::Close(_)) => break,
            // Ping/Pong are answered by tungstenite
            Ok(_) => {}
            Err(e) => {
                outcome = Err(e.into());
                break;
            }
        }

        while tasks.try_join_next().is_some() {}
    }

    cancel.cancel();
    while tasks.join_next().await.is_some() {}
    drop(tx);
    let _ = writer.await;
    outcome
}

fn check_auth(req: &Request, expected: Option<&str>) -> Result<(), ErrorResponse> {
    let header = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth::authorized(expected, header, req.uri().query()) {
        return Ok(());
    }
    warn!("rejected unauthenticated terminal connection");
    let mut resp = ErrorResponse::new(Some("Unauthorized".to_string()));
    *resp.status_mut() = StatusCode::UNAUTHORIZED;
    Err(resp)
}
