// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

fn wal_len(path: &Path) -> u64 {
    std::fs::metadata(wal_path(path)).map(|m| m.len()).unwrap_or(0)
}

#[test]
fn rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let id = {
        let store = FileStore::open(&path).unwrap();
        let row = store.insert("agent_activities", json!({"agent_id": "terminal"})).unwrap();
        let id = row["id"].as_str().unwrap().to_string();
        store.update("agent_activities", &id, json!({"seen": true})).unwrap();
        id
    };

    let store = FileStore::open(&path).unwrap();
    let rows = store.query("agent_activities", &Query::new()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(id));
    assert_eq!(rows[0]["seen"], json!(true));
}

#[test]
fn insert_appends_to_the_log_without_writing_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();

    store.insert("t", json!({"a": 1})).unwrap();
    let after_one = wal_len(&path);
    store.insert("t", json!({"a": 2})).unwrap();
    let after_two = wal_len(&path);

    assert!(!path.exists());
    assert!(after_one > 0);
    // Second write costs one line, not the whole history again.
    assert!(after_two < after_one * 3, "{after_one} -> {after_two}");
}

#[test]
fn insert_cost_does_not_grow_with_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    let big = "x".repeat(2048);

    store.insert("t", json!({"blob": big})).unwrap();
    let first = wal_len(&path);
    for _ in 0..200 {
        store.insert("t", json!({"blob": big})).unwrap();
    }
    let before = wal_len(&path);
    store.insert("t", json!({"blob": big})).unwrap();
    let last = wal_len(&path) - before;

    assert!(last <= first + 64, "first {first} bytes, last {last} bytes");
}

#[test]
fn log_is_checkpointed_into_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();

    for n in 0..CHECKPOINT_EVERY {
        store.insert("t", json!({ "n": n })).unwrap();
    }

    assert!(path.exists());
    assert_eq!(wal_len(&path), 0);
    drop(store);
    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.query("t", &Query::new()).unwrap().len() as u64, CHECKPOINT_EVERY);
}

#[test]
fn flush_writes_snapshot_and_empties_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.insert("t", json!({"a": 1})).unwrap();

    store.flush().unwrap();

    assert!(path.exists());
    assert_eq!(wal_len(&path), 0);
    let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["seq"], json!(1));
    assert_eq!(doc["tables"]["t"].as_array().unwrap().len(), 1);
}

#[test]
fn entries_already_in_snapshot_are_not_replayed_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    {
        let store = FileStore::open(&path).unwrap();
        store.insert("t", json!({"a": 1})).unwrap();
        store.flush().unwrap();
        store.insert("t", json!({"a": 2})).unwrap();
    }
    // Crash between snapshot write and log truncation: the log still holds seq 1.
    let line = r#"{"seq":1,"op":"insert","table":"t","row":{"id":"dup","a":1}}"#;
    let wal = std::fs::read_to_string(wal_path(&path)).unwrap();
    std::fs::write(wal_path(&path), format!("{line}\n{wal}")).unwrap();

    let store = FileStore::open(&path).unwrap();
    let rows = store.query("t", &Query::new()).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["id"] != json!("dup")));
}

#[test]
fn torn_log_tail_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    {
        let store = FileStore::open(&path).unwrap();
        store.insert("t", json!({"a": 1})).unwrap();
    }
    let mut wal = std::fs::read_to_string(wal_path(&path)).unwrap();
    wal.push_str(r#"{"seq":2,"op":"ins"#);
    std::fs::write(wal_path(&path), wal).unwrap();

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.query("t", &Query::new()).unwrap().len(), 1);
    store.insert("t", json!({"a": 3})).unwrap();
    drop(store);
    assert_eq!(FileStore::open(&path).unwrap().query("t", &Query::new()).unwrap().len(), 2);
}

#[test]
fn reopen_backs_up_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    store.insert("t", json!({"a": 1})).unwrap();
    store.flush().unwrap();
    drop(store);

    FileStore::open(&path).unwrap();
    assert!(path.with_extension("bak").exists());
}

#[test]
fn corrupt_snapshot_is_moved_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.query("t", &Query::new()).unwrap().is_empty());
    assert_eq!(std::fs::read_to_string(path.with_extension("bak")).unwrap(), "{not json");
    assert!(!path.exists());
}

#[test]
fn failed_update_is_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStore::open(&path).unwrap();

    let err = store.update("t", "missing", json!({"a": 1})).unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(wal_len(&path), 0);
}

#[test]
fn missing_directory_is_created_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/store.json");
    let store = FileStore::open(&path).unwrap();
    store.insert("t", json!({})).unwrap();
    assert!(wal_path(&path).exists());
    assert_eq!(store.path(), path.as_path());
}
