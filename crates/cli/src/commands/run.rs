// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `codexi run` - run one command in a terminal session

use anyhow::Result;
use clap::Args;
use codexi_core::{RequestId, SessionId};
use codexi_wire::{CommandRequest, CommandResult};

use crate::client::{TerminalClient, TerminalError};
use crate::exit_error::ExitError;
use crate::output::{format_or_json, result_footer, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Session the command runs in
    #[arg(long, short = 's')]
    pub session: String,

    /// Project the command is logged under
    #[arg(long)]
    pub project: String,

    /// Working directory inside the session
    #[arg(long)]
    pub cwd: Option<String>,

    /// Close the session (deleting its directory) afterwards
    #[arg(long)]
    pub close: bool,

    /// Command and arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl RunArgs {
    pub fn request(&self) -> Option<CommandRequest> {
        let (command, args) = self.command.split_first()?;
        let mut request = CommandRequest::new(
            command.as_str(),
            args.to_vec(),
            self.project.as_str(),
            self.session.as_str(),
        )
        .with_request_id(RequestId::new());
        if let Some(cwd) = &self.cwd {
            request = request.with_cwd(cwd.as_str());
        }
        Some(request)
    }
}

/// Exit status mirroring the remote command: 0, its code, or 1 when the code
/// does not fit a process status.
pub(crate) fn exit_code(result: &CommandResult) -> i32 {
    match result.exit_code {
        0 if result.success => 0,
        code @ 1..=255 => code,
        _ => 1,
    }
}

pub async fn handle(
    args: RunArgs,
    url: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let request = args.request().ok_or_else(|| ExitError::new(2, "no command given"))?;
    let mut client = TerminalClient::connect(url, token).await?;

    let outcome = client.run(request).await;
    if args.close {
        if let Err(e) = client.close_session(SessionId::new(args.session.as_str())).await {
            eprintln!("warning: failed to close session: {e}");
        }
    }
    client.close().await;

    let result = match outcome {
        Ok(result) => result,
        Err(TerminalError::Rejected(message)) => return Err(ExitError::new(1, message).into()),
        Err(e) => return Err(e.into()),
    };

    format_or_json(format, &result, || {
        print!("{}", result.stdout);
        eprint!("{}", result.stderr);
        eprintln!("{}", crate::color::context(&result_footer(&result)));
    })?;

    match exit_code(&result) {
        0 => Ok(()),
        code => Err(ExitError::silent(code).into()),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
