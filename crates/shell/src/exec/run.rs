// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawn, supervise, and reap one child process.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use super::capture::Capture;
use super::error::ExecError;
use super::result::{ExecOutput, TIMEOUT_EXIT_CODE};
use super::CommandSpec;
use crate::ExecPolicy;

/// How the wait on the child ended.
enum Outcome {
    Exited(std::process::ExitStatus),
    WaitFailed(std::io::Error),
    TimedOut,
    Cancelled,
}

pub(crate) async fn run_command(
    policy: &ExecPolicy,
    spec: &CommandSpec,
    cancel: &CancellationToken,
) -> Result<ExecOutput, ExecError> {
    tokio::fs::create_dir_all(&spec.cwd)
        .await
        .map_err(|source| ExecError::WorkingDir { path: spec.cwd.clone(), source })?;

    let cmd_span = tracing::info_span!(
        "shell.cmd",
        cmd = %spec.program,
        args = ?spec.args,
        exit_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    let mut process = Command::new(&spec.program);
    process
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .env_clear()
        .env("PATH", &policy.path)
        .env("HOME", &spec.home)
        .env("USER", &policy.user)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    process.process_group(0);

    let mut child = process
        .spawn()
        .map_err(|source| ExecError::SpawnFailed { command: spec.program.clone(), source })?;

    let pid = child.id();
    let stdout = Capture::spawn(child.stdout.take(), policy.output_cap);
    let stderr = Capture::spawn(child.stderr.take(), policy.output_cap);

    let outcome = tokio::select! {
        waited = tokio::time::timeout(policy.timeout, child.wait()) => match waited {
            Ok(Ok(status)) => Outcome::Exited(status),
            Ok(Err(source)) => Outcome::WaitFailed(source),
            Err(_) => Outcome::TimedOut,
        },
        _ = cancel.cancelled() => Outcome::Cancelled,
    };

    let timed_out = matches!(outcome, Outcome::TimedOut);
    let exit_code = match outcome {
        Outcome::Exited(status) => {
            // Leftover background jobs would keep the pipes open.
            kill_stragglers(pid);
            status.code().unwrap_or(-1)
        }
        Outcome::WaitFailed(source) => {
            kill_group(&mut child);
            return Err(ExecError::Wait { command: spec.program.clone(), source });
        }
        Outcome::TimedOut => {
            cmd_span.in_scope(|| {
                tracing::warn!(timeout_ms = policy.timeout.as_millis() as u64, "command timed out")
            });
            kill_group(&mut child);
            let _ = child.wait().await;
            TIMEOUT_EXIT_CODE
        }
        Outcome::Cancelled => {
            cmd_span.in_scope(|| tracing::debug!("command cancelled"));
            kill_group(&mut child);
            let _ = child.wait().await;
            return Err(ExecError::Cancelled { command: spec.program.clone() });
        }
    };

    let (stdout, out_truncated) = stdout.finish(policy.drain_grace).await;
    let (mut stderr, err_truncated) = stderr.finish(policy.drain_grace).await;
    if timed_out {
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&format!(
            "command timed out after {}ms and was killed\n",
            policy.timeout.as_millis()
        ));
    }

    let duration = start.elapsed();
    cmd_span.record("exit_code", exit_code);
    cmd_span.record("duration_ms", duration.as_millis() as u64);

    Ok(ExecOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
        truncated: out_truncated || err_truncated,
        duration,
    })
}

/// Kill the child and everything it started.
fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;
        if let Some(pid) = child.id() {
            if killpg(Pid::from_raw(pid as i32), Signal::SIGKILL).is_ok() {
                return;
            }
        }
    }
    let _ = child.start_kill();
}

/// Kill whatever is left in the group after its leader exited.
fn kill_stragglers(pid: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;
        if let Some(pid) = pid {
            let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}
