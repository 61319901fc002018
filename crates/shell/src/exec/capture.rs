// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded capture of a child output pipe.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Buffer {
    bytes: Vec<u8>,
    truncated: bool,
}

/// Collects up to `cap` bytes from a pipe and discards the rest.
///
/// The buffer is shared with the reader task so whatever was read is still
/// available if the task has to be aborted (a grandchild holding the pipe
/// open).
pub(crate) struct Capture {
    buf: Arc<Mutex<Buffer>>,
    task: Option<JoinHandle<()>>,
}

impl Capture {
    pub(crate) fn spawn<R>(reader: Option<R>, cap: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Buffer::default()));
        let task = reader.map(|mut reader| {
            let buf = Arc::clone(&buf);
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    let n = match reader.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => n,
                    };
                    let mut guard = buf.lock();
                    let room = cap.saturating_sub(guard.bytes.len());
                    if n > room {
                        guard.truncated = true;
                    }
                    let keep = n.min(room);
                    guard.bytes.extend_from_slice(&chunk[..keep]);
                }
            })
        });
        Self { buf, task }
    }

    /// Wait up to `grace` for EOF, then take what was captured.
    pub(crate) async fn finish(mut self, grace: std::time::Duration) -> (String, bool) {
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(grace, &mut task).await.is_err() {
                task.abort();
            }
        }
        let guard = self.buf.lock();
        (String::from_utf8_lossy(&guard.bytes).into_owned(), guard.truncated)
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
