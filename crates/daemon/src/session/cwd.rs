// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Component, Path, PathBuf};

use super::SessionError;

/// Resolve a requested working directory against the session directory.
///
/// Relative paths are joined under the session directory; absolute paths must
/// already lie inside it. Resolution is lexical: `..` may not climb above the
/// session directory.
pub fn resolve_cwd(session_dir: &Path, requested: Option<&str>) -> Result<PathBuf, SessionError> {
    let Some(requested) = requested.filter(|s| !s.trim().is_empty()) else {
        return Ok(session_dir.to_path_buf());
    };
    let outside = || SessionError::CwdOutside(requested.to_string());

    let path = Path::new(requested);
    let relative = if path.is_absolute() {
        let normalized = normalize_absolute(path);
        normalized.strip_prefix(session_dir).map_err(|_| outside())?.to_path_buf()
    } else {
        path.to_path_buf()
    };

    let mut resolved = session_dir.to_path_buf();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return Err(outside());
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return Err(outside()),
        }
    }
    Ok(resolved)
}

fn normalize_absolute(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "cwd_tests.rs"]
mod tests;
