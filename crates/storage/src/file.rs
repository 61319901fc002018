// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store persisted as a snapshot plus a write-ahead log.
//!
//! Mutations append one line to `<path>.wal`. Every [`CHECKPOINT_EVERY`]
//! entries, and on [`Store::flush`], the tables are written to the snapshot
//! at `<path>` and the log is emptied. Opening replays the log over the
//! snapshot; the previous snapshot is rotated into a `.bak` once per open.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backup::{rotate_bak_path, write_atomic};
use crate::memory::{update_in, Tables};
use crate::store::{check_table, row_id, stamp};
use crate::wal::{Op, Wal};
use crate::{Query, Row, Store, StoreError};

/// Current snapshot schema version
const DOCUMENT_VERSION: u32 = 1;

/// WAL entries between automatic checkpoints.
pub const CHECKPOINT_EVERY: u64 = 1000;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "v")]
    version: u32,
    /// Last WAL sequence folded into `tables`
    #[serde(default)]
    seq: u64,
    #[serde(default)]
    tables: Tables,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    #[serde(rename = "v")]
    version: u32,
    seq: u64,
    tables: &'a Tables,
}

#[derive(Debug)]
struct Inner {
    tables: Tables,
    wal: Wal,
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl FileStore {
    /// Open (or create) the store at `path`.
    ///
    /// An unreadable snapshot is moved aside to a backup and the store
    /// starts from the log alone.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let (seq, mut tables) = load_snapshot(&path)?;
        let (wal, replay) = Wal::open(&wal_path(&path), seq)?;

        let replayed = replay.len();
        for entry in replay {
            apply(&mut tables, entry.op);
        }
        tracing::debug!(
            path = %path.display(),
            tables = tables.len(),
            snapshot_seq = seq,
            replayed,
            "store opened",
        );

        let store = Self { path, inner: Mutex::new(Inner { tables, wal }) };
        if replayed > 0 {
            store.checkpoint()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot and empty the log.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        self.checkpoint_locked(&mut inner)
    }

    fn checkpoint_locked(&self, inner: &mut Inner) -> Result<(), StoreError> {
        let seq = inner.wal.write_seq();
        let doc = DocumentRef { version: DOCUMENT_VERSION, seq, tables: &inner.tables };
        let bytes = serde_json::to_vec(&doc)?;
        write_atomic(&self.path, &bytes)?;
        inner.wal.truncate()?;
        tracing::debug!(path = %self.path.display(), seq, "store checkpoint");
        Ok(())
    }

    fn log(&self, inner: &mut Inner, op: &Op) -> Result<(), StoreError> {
        inner.wal.append(op)?;
        if inner.wal.len() >= CHECKPOINT_EVERY {
            // The entry is durable in the log; a failed checkpoint retries later.
            if let Err(e) = self.checkpoint_locked(inner) {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint failed");
            }
        }
        Ok(())
    }
}

fn wal_path(path: &Path) -> PathBuf {
    path.with_extension("wal")
}

fn load_snapshot(path: &Path) -> Result<(u64, Tables), StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, Tables::new())),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice::<Document>(&bytes) {
        Ok(doc) => {
            if doc.version > DOCUMENT_VERSION {
                tracing::warn!(version = doc.version, "store snapshot is newer than this build");
            }
            std::fs::copy(path, rotate_bak_path(path))?;
            Ok((doc.seq, doc.tables))
        }
        Err(e) => {
            let bak = rotate_bak_path(path);
            tracing::warn!(
                path = %path.display(),
                backup = %bak.display(),
                error = %e,
                "store snapshot unreadable, starting from the log",
            );
            std::fs::rename(path, &bak)?;
            Ok((0, Tables::new()))
        }
    }
}

/// Replay one logged mutation.
fn apply(tables: &mut Tables, op: Op) {
    match op {
        Op::Insert { table, row } => tables.entry(table).or_default().push(row),
        Op::Update { table, id, patch } => {
            if let Err(e) = update_in(tables, &table, &id, patch) {
                tracing::warn!(%table, %id, error = %e, "skipping unreplayable update");
            }
        }
    }
}

impl Store for FileStore {
    fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError> {
        check_table(table)?;
        let row = stamp(row)?;
        let mut inner = self.inner.lock();
        self.log(&mut inner, &Op::Insert { table: table.to_string(), row: row.clone() })?;
        inner.tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    fn query(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        check_table(table)?;
        let inner = self.inner.lock();
        Ok(inner.tables.get(table).map(|rows| query.apply(rows.iter())).unwrap_or_default())
    }

    fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        check_table(table)?;
        let mut inner = self.inner.lock();
        // The log never holds an update that fails to apply.
        let exists = inner
            .tables
            .get(table)
            .is_some_and(|rows| rows.iter().any(|r| row_id(r) == Some(id)));
        if !exists {
            return Err(StoreError::NotFound { table: table.to_string(), id: id.to_string() });
        }
        if !patch.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let op = Op::Update { table: table.to_string(), id: id.to_string(), patch: patch.clone() };
        self.log(&mut inner, &op)?;
        update_in(&mut inner.tables, table, id, patch)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.wal.sync()?;
        if inner.wal.len() > 0 {
            self.checkpoint_locked(&mut inner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
