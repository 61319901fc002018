// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical gateway operations: list models, chat, and agent role calls.
//!
//! Every operation validates its input before touching the network and
//! performs at most one vendor request.

use std::sync::Arc;

use codexi_core::{AgentAction, AgentRole, Provider, RoleError};
use codexi_wire::{AgentRequest, GatewayRequest};
use thiserror::Error;

use crate::prompt::agent_prompt;
use crate::vendor::{ExtractError, VendorAdapter, VendorRegistry};
use crate::{HttpTransport, TransportError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unsupported provider")]
    UnsupportedProvider(String),
    #[error("API key is required")]
    MissingApiKey,
    #[error("Message is required")]
    MissingMessage,
    #[error(transparent)]
    Role(#[from] RoleError),
    /// Vendor answered with a non-2xx status.
    #[error("{provider} API error: {status_text}")]
    Vendor { provider: Provider, status: u16, status_text: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Malformed(#[from] ExtractError),
}

impl GatewayError {
    /// Caller's fault; nothing was sent to a vendor.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GatewayError::UnsupportedProvider(_)
                | GatewayError::MissingApiKey
                | GatewayError::MissingMessage
                | GatewayError::Role(_)
        )
    }

    pub fn is_unknown_role(&self) -> bool {
        matches!(self, GatewayError::Role(RoleError::UnknownRole(_)))
    }
}

/// Result of one agent role call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub role: AgentRole,
    pub action: AgentAction,
    pub provider: Provider,
    pub response: String,
}

/// Stateless façade over the vendor registry and a transport.
#[derive(Clone)]
pub struct Gateway<T: HttpTransport> {
    transport: T,
    vendors: Arc<VendorRegistry>,
}

impl<T: HttpTransport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self::with_registry(transport, VendorRegistry::standard())
    }

    pub fn with_registry(transport: T, vendors: VendorRegistry) -> Self {
        Self { transport, vendors: Arc::new(vendors) }
    }

    fn resolve(&self, provider: &str) -> Result<&dyn VendorAdapter, GatewayError> {
        provider
            .parse::<Provider>()
            .ok()
            .and_then(|p| self.vendors.get(p))
            .ok_or_else(|| GatewayError::UnsupportedProvider(provider.to_string()))
    }

    pub async fn list_models(&self, req: &GatewayRequest) -> Result<Vec<String>, GatewayError> {
        let vendor = self.resolve(&req.provider)?;
        let api_key = required_key(req.api_key.as_deref())?;
        let Some(request) = vendor.models_request(api_key) else {
            return Ok(vendor.static_models());
        };
        let body = self.send(vendor.provider(), request).await?;
        Ok(vendor.extract_models(&body)?)
    }

    pub async fn chat(&self, req: &GatewayRequest) -> Result<String, GatewayError> {
        let vendor = self.resolve(&req.provider)?;
        let api_key = required_key(req.api_key.as_deref())?;
        let message = match req.message.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(GatewayError::MissingMessage),
        };
        self.complete(vendor, api_key, req.model.as_deref(), message).await
    }

    /// Validate a role call, render its prompt, and run one chat.
    pub async fn agent(&self, role: &str, req: &AgentRequest) -> Result<AgentReply, GatewayError> {
        let role: AgentRole = role.parse()?;
        let action: AgentAction = req.action.parse()?;
        role.check_action(action)?;
        let vendor = self.resolve(&req.provider)?;
        let api_key = required_key(req.api_key.as_deref())?;
        if req.message.trim().is_empty() {
            return Err(GatewayError::MissingMessage);
        }

        let prompt = agent_prompt(role, action, &req.message);
        let response = self.complete(vendor, api_key, req.model.as_deref(), &prompt).await?;
        Ok(AgentReply { role, action, provider: vendor.provider(), response })
    }

    async fn complete(
        &self,
        vendor: &dyn VendorAdapter,
        api_key: &str,
        model: Option<&str>,
        message: &str,
    ) -> Result<String, GatewayError> {
        let model = model.filter(|m| !m.is_empty()).unwrap_or(vendor.default_model());
        let request = vendor.chat_request(api_key, model, message);
        let body = self.send(vendor.provider(), request).await?;
        Ok(vendor.extract_chat(&body)?)
    }

    async fn send(
        &self,
        provider: Provider,
        request: crate::VendorRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = request.redacted_url().to_string();
        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::warn!(%provider, %url, error = %e, "vendor transport failed");
        })?;
        if !response.is_success() {
            tracing::warn!(%provider, %url, status = response.status, "vendor returned error status");
            return Err(GatewayError::Vendor {
                provider,
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(response.body)
    }
}

fn required_key(key: Option<&str>) -> Result<&str, GatewayError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(GatewayError::MissingApiKey),
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
