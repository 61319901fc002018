// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role dispatch: one endpoint per agent role, one request per call.
//!
//! Failures never propagate. The caller gets `None` and the user gets a
//! notification through the configured [`NotifyAdapter`].

use codexi_adapters::NotifyAdapter;
use codexi_core::{AgentAction, AgentRole, ProjectId};
use codexi_wire::AgentRequest;
use serde_json::Value;
use tracing::warn;

use super::GatewayClient;

pub struct RoleClient<N: NotifyAdapter> {
    gateway: GatewayClient,
    notifier: N,
    provider: String,
    api_key: String,
    project_id: Option<ProjectId>,
    model: Option<String>,
}

impl<N: NotifyAdapter> RoleClient<N> {
    pub fn new(
        gateway: GatewayClient,
        notifier: N,
        provider: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            provider: provider.into(),
            api_key: api_key.into(),
            project_id: None,
            model: None,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// POST `{action, message, ...}` to the role's endpoint.
    pub async fn call(&self, role: AgentRole, action: AgentAction, message: &str) -> Option<Value> {
        let request = AgentRequest {
            action: action.to_string(),
            message: message.to_string(),
            provider: self.provider.clone(),
            api_key: Some(self.api_key.clone()),
            project_id: self.project_id.clone(),
            model: self.model.clone(),
        };
        match self.gateway.agent(role, &request).await {
            Ok(body) => Some(body),
            Err(e) => {
                let title = format!("{} request failed", role.display_name());
                if let Err(notify_err) = self.notifier.notify(&title, &e.to_string()).await {
                    warn!(error = %notify_err, "failed to deliver notification");
                }
                None
            }
        }
    }

    pub async fn chat(&self, role: AgentRole, message: &str) -> Option<Value> {
        self.call(role, AgentAction::Chat, message).await
    }

    pub async fn plan_project(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Manager, AgentAction::Plan, message).await
    }

    pub async fn assign_tasks(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Manager, AgentAction::Assign, message).await
    }

    pub async fn design_architecture(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Architect, AgentAction::Design, message).await
    }

    pub async fn implement_feature(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Fullstack, AgentAction::Implement, message).await
    }

    pub async fn review_code(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Fullstack, AgentAction::Review, message).await
    }

    pub async fn deploy(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Devops, AgentAction::Deploy, message).await
    }

    pub async fn configure_infrastructure(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Devops, AgentAction::Configure, message).await
    }

    pub async fn security_audit(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Security, AgentAction::Audit, message).await
    }

    pub async fn vulnerability_scan(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Security, AgentAction::Scan, message).await
    }

    pub async fn write_tests(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Qa, AgentAction::Test, message).await
    }

    pub async fn analyze_performance(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Performance, AgentAction::Analyze, message).await
    }

    pub async fn optimize(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Performance, AgentAction::Optimize, message).await
    }

    pub async fn write_docs(&self, message: &str) -> Option<Value> {
        self.call(AgentRole::Docs, AgentAction::Document, message).await
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
