// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `codexi agent` - call one agent role

use anyhow::Result;
use clap::Args;
use codexi_adapters::StderrNotifyAdapter;
use codexi_core::{AgentAction, AgentRole};
use serde_json::Value;

use super::VendorArgs;
use crate::client::{GatewayClient, RoleClient};
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct AgentArgs {
    /// Role (manager, architect, fullstack, devops, security, qa, performance, docs)
    pub role: String,

    /// Action tag, e.g. chat, plan, implement, deploy
    pub action: String,

    /// Free-form message for the agent
    pub message: String,

    #[command(flatten)]
    pub vendor: VendorArgs,

    /// Project to log the call under
    #[arg(long)]
    pub project: Option<String>,
}

pub async fn handle(args: AgentArgs, gateway: GatewayClient, format: OutputFormat) -> Result<()> {
    let role: AgentRole = args.role.parse().map_err(|e| ExitError::new(2, format!("{e}")))?;
    let action: AgentAction = args.action.parse().map_err(|e| ExitError::new(2, format!("{e}")))?;

    let api_key = args.vendor.api_key()?;
    let mut client = RoleClient::new(gateway, StderrNotifyAdapter, &args.vendor.provider, api_key);
    if let Some(project) = args.project {
        client = client.with_project(project);
    }
    if let Some(model) = args.vendor.model {
        client = client.with_model(model);
    }

    // The notifier has already reported the failure.
    let body = client.call(role, action, &args.message).await.ok_or(ExitError::silent(1))?;
    format_or_json(format, &body, || println!("{}", response_text(&body)))
}

/// The `response` field, or the whole body when it is missing.
pub(crate) fn response_text(body: &Value) -> String {
    match body.get("response").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
