// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot Command Channel client.

use codexi_core::{RequestId, SessionId};
use codexi_wire::{ClientMessage, CommandRequest, CommandResult, ControlMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("cannot connect to terminal: {0}")]
    Connect(#[source] tungstenite::Error),

    #[error("invalid auth token")]
    BadToken,

    #[error("terminal channel error: {0}")]
    Socket(#[from] tungstenite::Error),

    #[error("malformed reply: {0}")]
    Protocol(#[from] codexi_wire::ProtocolError),

    /// The daemon answered with an error frame.
    #[error("{0}")]
    Rejected(String),

    #[error("connection closed before a reply arrived")]
    Closed,
}

pub struct TerminalClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TerminalClient {
    pub async fn connect(url: &str, token: Option<&str>) -> Result<Self, TerminalError> {
        let mut request = url.into_client_request().map_err(TerminalError::Connect)?;
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| TerminalError::BadToken)?;
            request.headers_mut().insert("authorization", value);
        }
        let (ws, _) =
            tokio_tungstenite::connect_async(request).await.map_err(TerminalError::Connect)?;
        Ok(Self { ws })
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), TerminalError> {
        let text = message.encode()?;
        self.ws.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_reply(&mut self) -> Result<ServerMessage, TerminalError> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                Message::Text(text) => return Ok(codexi_wire::decode(text.as_str())?),
                Message::Close(_) => break,
                _ => {}
            }
        }
        Err(TerminalError::Closed)
    }

    /// Send one command and wait for the reply carrying its request id.
    pub async fn run(&mut self, request: CommandRequest) -> Result<CommandResult, TerminalError> {
        let request_id = request.request_id.clone().unwrap_or_default();
        let request = request.with_request_id(request_id.clone());
        self.send(ClientMessage::Command(request)).await?;

        loop {
            match self.next_reply().await? {
                ServerMessage::CommandResult(result)
                    if answers(&result.request_id, &request_id) =>
                {
                    return Ok(result);
                }
                ServerMessage::Error { message, request_id: id } if answers(&id, &request_id) => {
                    return Err(TerminalError::Rejected(message));
                }
                _ => {}
            }
        }
    }

    pub async fn close_session(&mut self, session_id: SessionId) -> Result<(), TerminalError> {
        self.send(ClientMessage::Control(ControlMessage::CloseSession { session_id })).await?;
        loop {
            match self.next_reply().await? {
                ServerMessage::SessionClosed { .. } => return Ok(()),
                ServerMessage::Error { message, request_id: None } => {
                    return Err(TerminalError::Rejected(message));
                }
                _ => {}
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Replies without an id (parse errors) also end the wait.
fn answers(reply: &Option<RequestId>, sent: &RequestId) -> bool {
    match reply {
        Some(id) => id == sent,
        None => true,
    }
}
