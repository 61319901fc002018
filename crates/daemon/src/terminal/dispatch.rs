// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turn one Command Request into exactly one Command Result or Error.

use std::path::PathBuf;

use codexi_core::{ActivityLogEntry, Clock, SystemClock, TerminalActivity};
use codexi_shell::{CommandExecutor, CommandSpec, ExecError, ExecOutput};
use codexi_storage::ActivityLog;
use codexi_wire::{CommandRequest, CommandResult, ServerMessage};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::TerminalCtx;
use crate::session::{resolve_cwd, SessionLease};

/// A request that passed validation and holds its place in the session queue.
pub(crate) struct Prepared {
    request: CommandRequest,
    lease: SessionLease,
    cwd: PathBuf,
}

/// Validate and enqueue. Rejections are answered immediately and not logged.
pub(crate) fn prepare(
    ctx: &TerminalCtx,
    request: CommandRequest,
) -> Result<Prepared, ServerMessage> {
    let reject = |message: String| {
        debug!(command = %request.command, %message, "rejected command request");
        ServerMessage::error(message, request.request_id.clone())
    };

    if let Err(e) = request.session_id.validate() {
        return Err(reject(e.to_string()));
    }
    if let Err(e) = ctx.executor.policy().check(&request.command) {
        return Err(reject(e.to_string()));
    }
    let lease = ctx.sessions.checkout(&request.session_id).map_err(|e| reject(e.to_string()))?;
    let cwd =
        resolve_cwd(lease.dir(), request.cwd.as_deref()).map_err(|e| reject(e.to_string()))?;

    Ok(Prepared { request, lease, cwd })
}

/// Wait for the session's turn, run, log the attempt, and build the reply.
pub(crate) async fn execute(
    executor: &CommandExecutor,
    activity: &ActivityLog,
    prepared: Prepared,
    connection: &CancellationToken,
) -> ServerMessage {
    let Prepared { request, lease, cwd } = prepared;
    let request_id = request.request_id.clone();

    let turn = match lease.turn().await {
        Ok(turn) => turn,
        Err(e) => return ServerMessage::error(e.to_string(), request_id),
    };

    let spec =
        CommandSpec::new(&request.command, request.args.clone(), &cwd).with_home(lease.dir());
    let result = {
        let run = executor.run(&spec, &turn.cancel);
        tokio::pin!(run);
        let raced = tokio::select! {
            result = &mut run => Some(result),
            _ = connection.cancelled() => None,
        };
        match raced {
            Some(result) => result,
            None => {
                turn.cancel.cancel();
                run.await
            }
        }
    };
    drop(turn);

    let command = request.display_command();
    match result {
        Ok(output) => {
            log_attempt(
                activity,
                &request,
                output.exit_code,
                output.success(),
                &output.stdout,
                &output.stderr,
            )
            .await;
            ServerMessage::CommandResult(command_result(request_id, command, output, &cwd))
        }
        Err(e) => {
            let message = e.to_string();
            if !e.is_rejection() {
                log_attempt(activity, &request, -1, false, "", &message).await;
            }
            if matches!(e, ExecError::Cancelled { .. }) {
                debug!(%command, "command cancelled");
            }
            ServerMessage::error(message, request_id)
        }
    }
}

fn command_result(
    request_id: Option<codexi_core::RequestId>,
    command: String,
    output: ExecOutput,
    cwd: &std::path::Path,
) -> CommandResult {
    CommandResult {
        request_id,
        command,
        success: output.success(),
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
        cwd: cwd.display().to_string(),
        timed_out: output.timed_out,
        truncated: output.truncated,
    }
}

async fn log_attempt(
    activity: &ActivityLog,
    request: &CommandRequest,
    exit_code: i32,
    success: bool,
    stdout: &str,
    stderr: &str,
) {
    let command = request.display_command();
    let entry = ActivityLogEntry::terminal_command(
        TerminalActivity {
            project_id: &request.project_id,
            session_id: &request.session_id,
            command: &command,
            exit_code,
            success,
            stdout,
            stderr,
        },
        SystemClock.now_utc(),
    );
    activity.record_async(entry).await;
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
