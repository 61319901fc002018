// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod agent;
pub mod daemon;
pub mod models;
pub mod run;

use clap::Args;

use crate::exit_error::ExitError;

/// Provider selection shared by gateway commands.
#[derive(Args, Debug, Clone)]
pub struct VendorArgs {
    /// Vendor name (openai, anthropic, deepseek, xai, gemini, cohere, mistral)
    #[arg(long, short = 'p')]
    pub provider: String,

    /// Vendor API key (default: $CODEXI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the vendor's default chat model
    #[arg(long)]
    pub model: Option<String>,
}

impl VendorArgs {
    pub fn api_key(&self) -> Result<String, ExitError> {
        self.api_key
            .clone()
            .or_else(crate::env::api_key)
            .ok_or_else(|| ExitError::new(2, "--api-key is required (or set CODEXI_API_KEY)"))
    }
}
