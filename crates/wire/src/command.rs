// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Channel messages.
//!
//! Inbound frames without a `type` field are Command Requests; frames with a
//! `type` field are control messages. Outbound frames are always tagged.

use codexi_core::{ProjectId, RequestId, SessionId};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Error message sent when an inbound frame is not a valid request.
pub const GENERIC_PARSE_ERROR: &str = "Invalid command request";

/// A user-issued command. Immutable after send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub project_id: ProjectId,
    pub session_id: SessionId,
    /// Working directory, relative to (or inside) the session directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Echoed on the matching result or error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl CommandRequest {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        project_id: impl Into<ProjectId>,
        session_id: impl Into<SessionId>,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            project_id: project_id.into(),
            session_id: session_id.into(),
            cwd: None,
            request_id: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<RequestId>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// The command and its arguments joined by spaces, as echoed in results.
    pub fn display_command(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Session-level control messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Tear the session down: cancel its commands and delete its directory.
    CloseSession {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
    Ping,
}

/// Any inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Command(CommandRequest),
    Control(ControlMessage),
}

impl ClientMessage {
    /// Decode an inbound text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.get("type").is_some() {
            Ok(ClientMessage::Control(serde_json::from_value(value)?))
        } else {
            Ok(ClientMessage::Command(serde_json::from_value(value)?))
        }
    }

    /// Encode as an outbound text frame (client side).
    pub fn encode(&self) -> Result<String, ProtocolError> {
        match self {
            ClientMessage::Command(req) => crate::encode(req),
            ClientMessage::Control(ctl) => crate::encode(ctl),
        }
    }
}

/// Outcome of one executed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
    pub cwd: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub timed_out: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Any outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    CommandResult(CommandResult),
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    SessionClosed {
        session_id: SessionId,
    },
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>, request_id: Option<RequestId>) -> Self {
        ServerMessage::Error { message: message.into(), request_id }
    }

    /// Request id this message answers, if any.
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            ServerMessage::CommandResult(r) => r.request_id.as_ref(),
            ServerMessage::Error { request_id, .. } => request_id.as_ref(),
            ServerMessage::SessionClosed { .. } | ServerMessage::Pong => None,
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
