// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn request_id_new_has_prefix() {
    let id = RequestId::new();
    assert!(id.as_str().starts_with("req-"));
    assert_eq!(id.len(), 23);
}

#[test]
fn request_ids_are_unique() {
    assert_ne!(RequestId::new(), RequestId::new());
}

#[test]
fn client_supplied_id_is_kept_verbatim() {
    let id = RequestId::from("abc-123");
    assert_eq!(id, "abc-123");
    assert_eq!(id.to_string(), "abc-123");
}

#[test]
fn id_hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(ProjectId::from("p1"), 42);
    assert_eq!(map.get("p1"), Some(&42));
}

#[test]
fn id_serializes_transparently() {
    let id = ProjectId::from("p1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
}

#[yare::parameterized(
    shorter   = { "abc", 8, "abc" },
    exact     = { "abcdefgh", 8, "abcdefgh" },
    truncated = { "abcdefghijklmnop", 8, "abcdefgh" },
    multibyte = { "héllo", 2, "h" },
)]
fn short_truncates(input: &str, n: usize, expected: &str) {
    assert_eq!(short(input, n), expected);
}
