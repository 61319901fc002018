// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared bearer-token check for the terminal and gateway listeners.

use axum::extract::Query;
use axum::http::Uri;
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenParam {
    token: Option<String>,
}

/// Extract a bearer token from an `Authorization` header value.
pub fn bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Extract and percent-decode `token=<value>` from a URI query string.
pub fn query_token(query: &str) -> Option<String> {
    let uri: Uri = format!("/?{query}").parse().ok()?;
    Query::<TokenParam>::try_from_uri(&uri).ok()?.0.token
}

/// Compare without short-circuiting on the first differing byte.
pub fn token_matches(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// True when no token is configured, or either credential matches it.
pub fn authorized(expected: Option<&str>, header: Option<&str>, query: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    match header.and_then(bearer) {
        Some(token) => token_matches(token, expected),
        None => query.and_then(query_token).is_some_and(|token| token_matches(&token, expected)),
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
