// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn rotation_keeps_three_backups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    for n in 1..=4 {
        let bak = rotate_bak_path(&path);
        std::fs::write(&bak, format!("{n}")).unwrap();
    }
    assert_eq!(std::fs::read_to_string(path.with_extension("bak")).unwrap(), "4");
    assert_eq!(std::fs::read_to_string(path.with_extension("bak.2")).unwrap(), "3");
    assert_eq!(std::fs::read_to_string(path.with_extension("bak.3")).unwrap(), "2");
    assert!(!path.with_extension("bak.4").exists());
}

#[test]
fn write_atomic_replaces_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/store.json");
    write_atomic(&path, b"one").unwrap();
    write_atomic(&path, b"two").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"two");
    assert!(!path.with_extension("tmp").exists());
}
