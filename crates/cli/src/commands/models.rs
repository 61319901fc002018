// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `codexi models` and `codexi chat` - direct vendor gateway calls

use anyhow::Result;
use clap::Args;
use codexi_wire::GatewayRequest;

use super::VendorArgs;
use crate::client::{ClientError, GatewayClient};
use crate::exit_error::ExitError;
use crate::output::{format_or_json, render_models, OutputFormat};

#[derive(Args)]
pub struct ModelsArgs {
    #[command(flatten)]
    pub vendor: VendorArgs,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Message to send
    pub message: String,

    #[command(flatten)]
    pub vendor: VendorArgs,
}

fn request(vendor: &VendorArgs, message: Option<String>) -> Result<GatewayRequest, ExitError> {
    Ok(GatewayRequest {
        provider: vendor.provider.clone(),
        api_key: Some(vendor.api_key()?),
        message,
        model: vendor.model.clone(),
    })
}

/// Gateway rejections exit 1 with the gateway's message.
fn exit_for(err: ClientError) -> ExitError {
    ExitError::new(1, err.to_string())
}

pub async fn models(args: ModelsArgs, gateway: GatewayClient, format: OutputFormat) -> Result<()> {
    let request = request(&args.vendor, None)?;
    let models = gateway.list_models(&request).await.map_err(exit_for)?;
    let obj = serde_json::json!({ "provider": args.vendor.provider, "models": models });
    format_or_json(format, &obj, || print!("{}", render_models(&models)))
}

pub async fn chat(args: ChatArgs, gateway: GatewayClient, format: OutputFormat) -> Result<()> {
    let request = request(&args.vendor, Some(args.message))?;
    let response = gateway.chat(&request).await.map_err(exit_for)?;
    let obj = serde_json::json!({ "response": response });
    format_or_json(format, &obj, || println!("{}", response))
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
