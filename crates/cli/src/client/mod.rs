// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clients for the daemon's HTTP gateway and terminal channel.

mod role;
mod terminal;

pub use role::RoleClient;
pub use terminal::{TerminalClient, TerminalError};

use codexi_core::AgentRole;
use codexi_wire::{AgentRequest, ChatResponse, ErrorBody, GatewayRequest, ModelsResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from gateway calls
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx reply; `message` is the body's `error` or the status text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("gateway unreachable: {0}")]
    Transport(String),

    #[error("unexpected gateway reply: {0}")]
    Decode(String),
}

/// HTTP client for `/functions/v1/*`.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), base_url, token }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let mut request = self.http.post(format!("{}{}", self.base_url, path)).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ClientError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ClientError::Api { status: status.as_u16(), message });
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn list_models(&self, request: &GatewayRequest) -> Result<Vec<String>, ClientError> {
        let reply: ModelsResponse = self.post("/functions/v1/list-models", request).await?;
        Ok(reply.models)
    }

    pub async fn chat(&self, request: &GatewayRequest) -> Result<String, ClientError> {
        let reply: ChatResponse = self.post("/functions/v1/chat", request).await?;
        Ok(reply.response)
    }

    /// Raw JSON body of a role call.
    pub async fn agent(
        &self,
        role: AgentRole,
        request: &AgentRequest,
    ) -> Result<Value, ClientError> {
        self.post(&role.endpoint(), request).await
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
