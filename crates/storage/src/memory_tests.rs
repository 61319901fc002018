// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

#[test]
fn insert_stamps_id_and_created_at() {
    let store = MemoryStore::new();
    let a = store.insert("projects", json!({"name": "a"})).unwrap();
    let b = store.insert("projects", json!({"name": "b"})).unwrap();
    assert_ne!(a["id"], b["id"]);
    assert!(a["created_at"].is_string());
    assert_eq!(store.len("projects"), 2);
}

#[test]
fn insert_ignores_caller_supplied_id() {
    let store = MemoryStore::new();
    let row = store.insert("projects", json!({"id": "mine"})).unwrap();
    assert_ne!(row["id"], json!("mine"));
}

#[test]
fn insert_rejects_non_objects() {
    let store = MemoryStore::new();
    assert!(matches!(store.insert("projects", json!([1, 2])), Err(StoreError::NotAnObject)));
}

#[yare::parameterized(
    empty  = { "" },
    dotted = { "a.b" },
    slash  = { "../x" },
)]
fn invalid_table_names(table: &str) {
    let store = MemoryStore::new();
    assert!(matches!(store.insert(table, json!({})), Err(StoreError::InvalidTable(_))));
}

#[test]
fn update_merges_patch_and_keeps_identity() {
    let store = MemoryStore::new();
    let row = store.insert("projects", json!({"name": "a", "status": "new"})).unwrap();
    let id = row["id"].as_str().unwrap().to_string();

    store.update("projects", &id, json!({"status": "done", "id": "evil"})).unwrap();

    let rows = store.query("projects", &Query::new().eq("id", id.as_str())).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], json!("done"));
    assert_eq!(rows[0]["name"], json!("a"));
    assert_eq!(rows[0]["created_at"], row["created_at"]);
}

#[test]
fn update_missing_row_is_not_found() {
    let store = MemoryStore::new();
    let err = store.update("projects", "nope", json!({})).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn query_unknown_table_is_empty() {
    let store = MemoryStore::new();
    assert!(store.query("nothing", &Query::new()).unwrap().is_empty());
}
