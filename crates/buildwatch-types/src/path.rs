//! Lexical path normalization for store keys.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path purely lexically, without touching the filesystem.
///
/// Collapses repeated separators, resolves `.` and `..` segments where
/// possible, and drops any trailing separator, so that equivalent
/// spellings of the same workspace path produce the same store key:
/// `/a/b/`, `/a/./b` and `/a/c/../b` all normalize to `/a/b`.
///
/// `..` at the root is absorbed (`/..` becomes `/`); `..` that cannot be
/// resolved in a relative path is kept. An empty input normalizes to `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                match last {
                    Some(Component::Normal(_)) => {
                        normalized.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => normalized.push(".."),
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
