// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Store` trait and shared row helpers.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Query;

/// A stored row: a JSON object that always carries `id` and `created_at`.
pub type Row = Map<String, Value>;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row must be a JSON object")]
    NotAnObject,
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),
    #[error("no row {id} in {table}")]
    NotFound { table: String, id: String },
}

/// Row-level CRUD over named tables.
///
/// Callers never see a schema; rows are opaque JSON objects.
pub trait Store: Send + Sync {
    /// Insert a row, stamping `id` and `created_at`. Returns the stored row.
    fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError>;

    fn query(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Merge `patch` into the row with `id`. `id` and `created_at` are kept.
    fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Make every accepted mutation durable. Called on shutdown.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn check_table(table: &str) -> Result<(), StoreError> {
    let valid = !table.is_empty()
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

/// Turn an inserted value into a stamped row.
pub(crate) fn stamp(row: Value) -> Result<Row, StoreError> {
    let Value::Object(mut row) = row else {
        return Err(StoreError::NotAnObject);
    };
    row.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
    row.entry("created_at").or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    Ok(row)
}

/// Apply an update patch, leaving identity columns untouched.
pub(crate) fn merge(row: &mut Row, patch: Value) -> Result<(), StoreError> {
    let Value::Object(patch) = patch else {
        return Err(StoreError::NotAnObject);
    };
    for (key, value) in patch {
        if key == "id" || key == "created_at" {
            continue;
        }
        row.insert(key, value);
    }
    Ok(())
}

pub(crate) fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}
