// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_allows_common_tools() {
    let policy = ExecPolicy::default();
    assert!(policy.check("echo").is_ok());
    assert!(policy.check("ls").is_ok());
}

#[yare::parameterized(
    curl       = { "curl" },
    abs_path   = { "/bin/echo" },
    shell      = { "sh" },
    prefix     = { "ech" },
)]
fn default_rejects_unlisted(command: &str) {
    let err = ExecPolicy::default().check(command).unwrap_err();
    assert_eq!(err.to_string(), format!("command not allowed: {command}"));
}

#[test]
fn empty_command_is_rejected() {
    assert!(matches!(ExecPolicy::default().check(""), Err(ExecError::EmptyCommand)));
}

#[test]
fn star_allows_anything() {
    let policy = ExecPolicy::default().with_allow(AllowList::from_names(["ls", "*"]));
    assert_eq!(policy.allow, AllowList::Any);
    assert!(policy.check("/bin/anything").is_ok());
}

#[test]
fn from_names_trims_and_skips_blanks() {
    let allow = AllowList::from_names([" ls ", "", "git"]);
    assert!(allow.permits("ls"));
    assert!(allow.permits("git"));
    assert!(!allow.permits(""));
}
