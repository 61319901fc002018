// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session registry: one working directory per client-chosen session id.
//!
//! Commands within a session run one at a time in arrival order; commands in
//! different sessions run concurrently, bounded by a shared semaphore. Idle
//! sessions are evicted by a background sweeper. Directories left by an
//! earlier daemon are adopted at startup so the sweeper covers them too.
//!
//! Removing a session deletes its directory after the entry leaves the map.
//! A session re-created under the same id meanwhile waits for that deletion
//! before its first command runs.

mod cwd;

pub use cwd::resolve_cwd;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use codexi_core::{Clock, SessionId, SessionIdError, SystemClock, SESSION_DIR_PREFIX};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidId(#[from] SessionIdError),

    #[error("working directory outside session: {0}")]
    CwdOutside(String),

    #[error("session {0} was closed")]
    Closed(SessionId),
}

/// Live state of one session.
#[derive(Debug)]
struct SessionEntry {
    id: SessionId,
    dir: PathBuf,
    last_used_ms: AtomicU64,
    queue: Mutex<TicketQueue>,
    /// Woken whenever a ticket leaves the queue
    advanced: Notify,
    cancel: CancellationToken,
    /// Deletion of a previous incarnation's directory, if still running
    removal: Option<CancellationToken>,
}

/// Tickets are issued at checkout; the lowest outstanding ticket may execute.
#[derive(Debug, Default)]
struct TicketQueue {
    next: u64,
    outstanding: BTreeSet<u64>,
}

impl SessionEntry {
    fn is_head(&self, ticket: u64) -> bool {
        self.queue.lock().outstanding.first() == Some(&ticket)
    }

    fn is_idle(&self) -> bool {
        self.queue.lock().outstanding.is_empty()
    }

    fn release(&self, ticket: u64) {
        self.queue.lock().outstanding.remove(&ticket);
        self.advanced.notify_waiters();
    }

    /// Wait until `done` holds, or the session is cancelled when `cancellable`.
    async fn wait_until(&self, done: impl Fn(&Self) -> bool, cancellable: bool) -> bool {
        loop {
            let advanced = self.advanced.notified();
            tokio::pin!(advanced);
            advanced.as_mut().enable();
            if done(self) {
                return true;
            }
            if cancellable && self.cancel.is_cancelled() {
                return false;
            }
            tokio::select! {
                _ = &mut advanced => {}
                _ = self.cancel.cancelled(), if cancellable => return false,
            }
        }
    }
}

pub struct SessionRegistry<C: Clock = SystemClock> {
    root: PathBuf,
    ttl: Duration,
    clock: C,
    sessions: Mutex<Sessions>,
    permits: Arc<Semaphore>,
}

#[derive(Default)]
struct Sessions {
    live: HashMap<SessionId, Arc<SessionEntry>>,
    /// Directory deletions in flight; each token fires when its deletion ends
    removing: HashMap<SessionId, CancellationToken>,
}

impl Sessions {
    /// Take the entry out of the map and record that its directory is going.
    /// Returns the entry plus any earlier deletion to wait for.
    fn begin_removal(&mut self, id: &SessionId) -> (Option<Arc<SessionEntry>>, Removal) {
        let entry = self.live.remove(id);
        let done = CancellationToken::new();
        let prior = self.removing.insert(id.clone(), done.clone());
        (entry, Removal { id: id.clone(), done, prior })
    }

    fn end_removal(&mut self, removal: &Removal) {
        removal.done.cancel();
        if self.removing.get(&removal.id).is_some_and(CancellationToken::is_cancelled) {
            self.removing.remove(&removal.id);
        }
    }
}

struct Removal {
    id: SessionId,
    done: CancellationToken,
    prior: Option<CancellationToken>,
}

impl<C: Clock> SessionRegistry<C> {
    pub fn new(root: PathBuf, ttl: Duration, max_concurrent: usize, clock: C) -> Self {
        Self {
            root,
            ttl,
            clock,
            sessions: Mutex::new(Sessions::default()),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a session id maps to, whether or not it exists yet.
    pub fn dir_for(&self, id: &SessionId) -> PathBuf {
        self.root.join(id.dir_name())
    }

    /// Look up or lazily create the session and hold it open until the
    /// lease drops. The directory itself is created by the executor.
    pub fn checkout(&self, id: &SessionId) -> Result<SessionLease<C>, SessionError> {
        id.validate()?;
        let now = self.clock.epoch_ms();
        let (entry, ticket) = {
            let mut sessions = self.sessions.lock();
            let Sessions { live, removing } = &mut *sessions;
            let entry = live.entry(id.clone()).or_insert_with(|| {
                debug!(session_id = %id, "session created");
                self.new_entry(id, now, removing.get(id).cloned())
            });
            let ticket = {
                let mut queue = entry.queue.lock();
                let ticket = queue.next;
                queue.next += 1;
                queue.outstanding.insert(ticket);
                ticket
            };
            entry.last_used_ms.store(now, Ordering::SeqCst);
            (Arc::clone(entry), ticket)
        };
        Ok(SessionLease {
            entry,
            ticket,
            permits: Arc::clone(&self.permits),
            clock: self.clock.clone(),
        })
    }

    fn new_entry(
        &self,
        id: &SessionId,
        last_used_ms: u64,
        removal: Option<CancellationToken>,
    ) -> Arc<SessionEntry> {
        Arc::new(SessionEntry {
            id: id.clone(),
            dir: self.dir_for(id),
            last_used_ms: AtomicU64::new(last_used_ms),
            queue: Mutex::new(TicketQueue::default()),
            advanced: Notify::new(),
            cancel: CancellationToken::new(),
            removal,
        })
    }

    /// Register `codexi-session-*` directories already under the root.
    ///
    /// Each is treated as last used at its modification time (never later
    /// than now), so the sweeper evicts it once idle past the TTL. Other
    /// entries in the root are left alone. Returns how many were adopted.
    pub fn adopt_existing(&self) -> std::io::Result<usize> {
        let now = self.clock.epoch_ms();
        let mut found = Vec::new();
        for dirent in std::fs::read_dir(&self.root)?.flatten() {
            let name = dirent.file_name();
            let Some(id) = name.to_str().and_then(SessionId::from_dir_name) else {
                continue;
            };
            let Ok(meta) = dirent.metadata() else {
                continue;
            };
            if !meta.is_dir() {
                continue;
            }
            let modified_ms = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map_or(now, |d| d.as_millis() as u64);
            found.push((id, modified_ms.min(now)));
        }

        let mut sessions = self.sessions.lock();
        let mut adopted = 0;
        for (id, last_used_ms) in found {
            if sessions.live.contains_key(&id) {
                continue;
            }
            debug!(session_id = %id, "adopted session directory");
            sessions.live.insert(id.clone(), self.new_entry(&id, last_used_ms, None));
            adopted += 1;
        }
        if adopted > 0 {
            info!(adopted, prefix = SESSION_DIR_PREFIX, "adopted leftover session directories");
        }
        Ok(adopted)
    }

    /// Cancel everything running in the session and delete its directory.
    ///
    /// Queued commands observe the closure and fail without running.
    pub async fn close(&self, id: &SessionId) -> Result<(), SessionError> {
        id.validate()?;
        let (entry, removal) = self.sessions.lock().begin_removal(id);
        if let Some(entry) = &entry {
            entry.cancel.cancel();
            // Wait for the executing command (and anyone queued) to let go.
            entry.wait_until(SessionEntry::is_idle, false).await;
        }
        self.remove(&removal, &self.dir_for(id)).await;
        info!(session_id = %id, "session closed");
        Ok(())
    }

    /// Evict sessions idle longer than the TTL. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.epoch_ms();
        let ttl_ms = self.ttl.as_millis() as u64;
        let evicted: Vec<(Arc<SessionEntry>, Removal)> = {
            let mut sessions = self.sessions.lock();
            let expired: Vec<SessionId> = sessions
                .live
                .values()
                .filter(|e| e.is_idle())
                .filter(|e| now.saturating_sub(e.last_used_ms.load(Ordering::SeqCst)) > ttl_ms)
                .map(|e| e.id.clone())
                .collect();
            expired
                .iter()
                .filter_map(|id| match sessions.begin_removal(id) {
                    (Some(entry), removal) => Some((entry, removal)),
                    (None, removal) => {
                        sessions.end_removal(&removal);
                        None
                    }
                })
                .collect()
        };

        for (entry, removal) in &evicted {
            entry.cancel.cancel();
            self.remove(removal, &entry.dir).await;
            info!(session_id = %entry.id, "evicted idle session");
        }
        evicted.len()
    }

    async fn remove(&self, removal: &Removal, dir: &Path) {
        if let Some(prior) = &removal.prior {
            prior.cancelled().await;
        }
        remove_dir(dir).await;
        self.sessions.lock().end_removal(removal);
    }

    /// Run [`Self::sweep`] every `interval` until `shutdown` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = registry.sweep().await;
                        if evicted > 0 {
                            debug!(evicted, "session sweep");
                        }
                    }
                    _ = shutdown.cancelled() => break,
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().live.is_empty()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.lock().live.contains_key(id)
    }
}

async fn remove_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %dir.display(), error = %e, "failed to remove session directory"),
    }
}

/// A place in a session's queue. Keeps the session un-evictable while held.
pub struct SessionLease<C: Clock = SystemClock> {
    entry: Arc<SessionEntry>,
    ticket: u64,
    permits: Arc<Semaphore>,
    clock: C,
}

impl<C: Clock> SessionLease<C> {
    pub fn id(&self) -> &SessionId {
        &self.entry.id
    }

    pub fn dir(&self) -> &Path {
        &self.entry.dir
    }

    /// Wait for every earlier lease on this session to drop, then for a
    /// global execution slot.
    pub async fn turn(&self) -> Result<Turn, SessionError> {
        let closed = || SessionError::Closed(self.entry.id.clone());
        if let Some(removal) = &self.entry.removal {
            tokio::select! {
                _ = removal.cancelled() => {}
                _ = self.entry.cancel.cancelled() => return Err(closed()),
            }
        }
        let ticket = self.ticket;
        if !self.entry.wait_until(|e| e.is_head(ticket), true).await {
            return Err(closed());
        }
        let permit = tokio::select! {
            permit = Arc::clone(&self.permits).acquire_owned() => permit.map_err(|_| closed())?,
            _ = self.entry.cancel.cancelled() => return Err(closed()),
        };
        Ok(Turn { _permit: permit, cancel: self.entry.cancel.child_token() })
    }
}

impl<C: Clock> Drop for SessionLease<C> {
    fn drop(&mut self) {
        self.entry.last_used_ms.store(self.clock.epoch_ms(), Ordering::SeqCst);
        self.entry.release(self.ticket);
    }
}

/// Global execution slot, held while the session's command runs.
pub struct Turn {
    _permit: OwnedSemaphorePermit,
    /// Fires when the session is closed or evicted.
    pub cancel: CancellationToken,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
