// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Appends activity entries to the `agent_activities` table.

use std::sync::Arc;

use codexi_core::{ActivityLogEntry, ProjectId};

use crate::{Query, Row, Store, StoreError};

pub const ACTIVITY_TABLE: &str = "agent_activities";

/// Append-only writer over any [`Store`].
#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn Store>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn append(&self, entry: &ActivityLogEntry) -> Result<Row, StoreError> {
        let row = serde_json::to_value(entry)?;
        self.store.insert(ACTIVITY_TABLE, row)
    }

    /// Log without failing the caller; a store outage only costs the record.
    pub fn record(&self, entry: &ActivityLogEntry) {
        if let Err(e) = self.append(entry) {
            tracing::warn!(
                agent_id = %entry.agent_id,
                activity_type = %entry.activity_type,
                error = %e,
                "failed to log activity",
            );
        }
    }

    /// [`record`](Self::record) on the blocking pool, off the async workers.
    pub async fn record_async(&self, entry: ActivityLogEntry) {
        let log = self.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || log.record(&entry)).await {
            tracing::warn!(error = %e, "activity write task failed");
        }
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.store.flush()
    }

    /// Most recent entries for a project, newest first.
    pub fn recent(&self, project: &ProjectId, limit: usize) -> Result<Vec<Row>, StoreError> {
        let query = Query::new()
            .eq("project_id", project.as_str())
            .order_by("timestamp", true)
            .limit(limit);
        self.store.query(ACTIVITY_TABLE, &query)
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
