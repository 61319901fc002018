// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store; contents die with the process.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

use crate::store::{check_table, merge, row_id, stamp};
use crate::{Query, Row, Store, StoreError};

pub(crate) type Tables = HashMap<String, Vec<Row>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.tables.lock().get(table).map_or(0, Vec::len)
    }
}

impl Store for MemoryStore {
    fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError> {
        check_table(table)?;
        let row = stamp(row)?;
        self.tables.lock().entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    fn query(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        check_table(table)?;
        let tables = self.tables.lock();
        Ok(tables.get(table).map(|rows| query.apply(rows.iter())).unwrap_or_default())
    }

    fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        check_table(table)?;
        let mut tables = self.tables.lock();
        update_in(&mut tables, table, id, patch)
    }
}

pub(crate) fn update_in(
    tables: &mut Tables,
    table: &str,
    id: &str,
    patch: Value,
) -> Result<(), StoreError> {
    let row = tables
        .get_mut(table)
        .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
        .ok_or_else(|| StoreError::NotFound { table: table.to_string(), id: id.to_string() })?;
    merge(row, patch)
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
