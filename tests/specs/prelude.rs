// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs: CLI invocation, output assertions, and a
//! daemon process bound to ephemeral ports.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Output, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

pub use tempfile::TempDir;

/// Upper bound for waiting on daemon readiness.
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// Poll `f` every 20ms until it returns true or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut f: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if f() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    f()
}

pub fn codexi_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("codexi")
}

pub fn codexid_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("codexid")
}

/// `codexi` with a clean environment for the variables it reads.
pub fn cli() -> CliBuilder {
    let mut cmd = assert_cmd::Command::new(codexi_bin());
    for var in ["CODEXI_GATEWAY_URL", "CODEXI_TERMINAL_URL", "CODEXI_AUTH_TOKEN", "CODEXI_API_KEY"]
    {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.timeout(Duration::from_millis(SPEC_WAIT_MAX_MS)).output().unwrap();
        RunAssert { output }
    }

    /// Run and assert exit status 0.
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            run.output.status,
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and assert a non-zero exit status.
    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert!(!run.output.status.success(), "expected failure\nstdout: {}", run.stdout());
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}

/// `codexid` environment rooted in `state`: ephemeral loopback ports,
/// in-memory store, sessions under `state/sessions`.
pub fn daemon_command(state: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(codexid_bin());
    cmd.env("CODEXI_STATE_DIR", state)
        .env("CODEXI_SESSION_ROOT", state.join("sessions"))
        .env("CODEXI_TERMINAL_ADDR", "127.0.0.1:0")
        .env("CODEXI_GATEWAY_ADDR", "127.0.0.1:0")
        .env("CODEXI_STORE", "memory")
        .env("CODEXI_LOG_STDERR", "1")
        .env("CODEXI_LOG", "info")
        .env_remove("CODEXI_AUTH_TOKEN")
        .env_remove("CODEXI_ALLOWED_COMMANDS");
    cmd
}

/// A running `codexid`; killed on drop.
pub struct Daemon {
    child: Child,
    pub terminal: String,
    pub gateway: String,
    pub state: TempDir,
}

impl Daemon {
    pub fn start() -> Self {
        Self::start_with(&[])
    }

    pub fn start_with(envs: &[(&str, &str)]) -> Self {
        let state = TempDir::new().unwrap();
        let mut cmd = daemon_command(state.path());
        for (key, value) in envs {
            cmd.env(key, value);
        }
        let stderr_path = state.path().join("stderr.log");
        let stderr = std::fs::File::create(&stderr_path).unwrap();
        let mut child =
            cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(stderr).spawn().unwrap();

        let line = read_first_line(&mut child);
        let Some((terminal, gateway)) = line.as_deref().and_then(parse_ready) else {
            let _ = child.kill();
            let stderr = std::fs::read_to_string(&stderr_path).unwrap_or_default();
            panic!("daemon did not become ready: {line:?}\n{stderr}");
        };
        Self { child, terminal, gateway, state }
    }

    pub fn terminal_url(&self) -> String {
        format!("ws://{}", self.terminal)
    }

    pub fn gateway_url(&self) -> String {
        format!("http://{}", self.gateway)
    }

    /// Everything the daemon logged so far.
    pub fn log(&self) -> String {
        std::fs::read_to_string(self.state.path().join("stderr.log")).unwrap_or_default()
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.state.path().join("sessions")
    }

    /// `codexi` pointed at this daemon.
    pub fn codexi(&self) -> CliBuilder {
        cli().env("CODEXI_GATEWAY_URL", self.gateway_url()).env(
            "CODEXI_TERMINAL_URL",
            self.terminal_url(),
        )
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn read_first_line(child: &mut Child) -> Option<String> {
    let stdout = child.stdout.take()?;
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let read = BufReader::new(stdout).read_line(&mut line).ok().filter(|n| *n > 0);
        let _ = tx.send(read.map(|_| line));
    });
    rx.recv_timeout(Duration::from_millis(SPEC_WAIT_MAX_MS)).ok().flatten()
}

fn parse_ready(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix("READY ")?;
    let mut fields = rest.split_whitespace().filter_map(|f| f.split_once('='));
    let (_, terminal) = fields.next().filter(|(k, _)| *k == "terminal")?;
    let (_, gateway) = fields.next().filter(|(k, _)| *k == "gateway")?;
    Some((terminal.to_string(), gateway.to_string()))
}
