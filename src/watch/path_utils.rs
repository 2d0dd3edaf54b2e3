// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Component, Path};

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        let s = rel.to_string_lossy().replace('\\', "/");
        return Some(s);
    }

    // macOS reports /private/var/... for /var/...; a deleted file cannot be
    // canonicalized, so only its parent is.
    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok().or_else(|| {
        let parent = path.parent()?.canonicalize().ok()?;
        Some(parent.join(path.file_name()?))
    })?;

    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// Number of normal components of `path` below `root`, or `None` if `path`
/// is not under `root`.
///
/// `root/sub` has depth 1, `root/sub/sub2` depth 2.
pub fn depth_below(root: &Path, path: &Path) -> Option<usize> {
    let rel = path.strip_prefix(root).ok()?;
    Some(
        rel.components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count(),
    )
}

/// Whether the final component starts with a dot (`.git`, `.cache`, ...).
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') && n != "." && n != "..")
}
