// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of store mutations.
//!
//! One JSON object per line, each tagged with a sequence number. A snapshot
//! records the last sequence it contains; entries at or below it are skipped
//! on replay. A torn final line (crash mid-write) is cut off on open.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Row, StoreError};

/// One store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Op {
    Insert { table: String, row: Row },
    Update { table: String, id: String, patch: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct WalEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug)]
pub(crate) struct Wal {
    file: File,
    write_seq: u64,
    /// Entries appended since the log was last emptied
    len: u64,
}

impl Wal {
    /// Open (or create) the log, returning the entries after `processed_seq`.
    pub fn open(path: &Path, processed_seq: u64) -> Result<(Self, Vec<WalEntry>), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).read(true).append(true).open(path)?;

        let mut entries = Vec::new();
        let mut good_len = 0u64;
        let mut torn = false;
        let mut reader = BufReader::new(&file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            let complete = buf.last() == Some(&b'\n');
            match serde_json::from_slice::<WalEntry>(&buf) {
                Ok(entry) if complete => {
                    good_len += n as u64;
                    entries.push(entry);
                }
                parsed => {
                    let reason =
                        parsed.err().map_or("missing newline".to_string(), |e| e.to_string());
                    tracing::warn!(path = %path.display(), %reason, "dropping torn WAL tail");
                    torn = true;
                    break;
                }
            }
        }
        if torn {
            file.set_len(good_len)?;
        }

        let len = entries.len() as u64;
        let write_seq = entries.last().map_or(processed_seq, |e| e.seq.max(processed_seq));
        entries.retain(|e| e.seq > processed_seq);
        Ok((Self { file, write_seq, len }, entries))
    }

    /// Append one mutation. The line reaches the OS before this returns.
    pub fn append(&mut self, op: &Op) -> Result<u64, StoreError> {
        let seq = self.write_seq + 1;
        let mut line = serde_json::to_vec(&WalEntryRef { seq, op })?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.write_seq = seq;
        self.len += 1;
        Ok(seq)
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Entries currently in the file.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Empty the log once a snapshot covers everything in it.
    pub fn truncate(&mut self) -> Result<(), StoreError> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        self.len = 0;
        Ok(())
    }

    pub fn sync(&self) -> Result<(), StoreError> {
        self.file.sync_data()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct WalEntryRef<'a> {
    seq: u64,
    #[serde(flatten)]
    op: &'a Op,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
