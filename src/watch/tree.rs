// src/watch/tree.rs

//! Depth-limited directory tree watching.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::watch::path_utils::{depth_below, is_hidden};

/// Where directory watches actually get registered.
///
/// Production code uses the `notify` watcher in non-recursive mode; tests
/// record calls instead.
pub trait WatchRegistry: Send {
    fn watch(&mut self, dir: &Path) -> Result<()>;
    fn unwatch(&mut self, dir: &Path) -> Result<()>;
}

impl WatchRegistry for RecommendedWatcher {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        Watcher::watch(self, dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unwatch(&mut self, dir: &Path) -> Result<()> {
        Watcher::unwatch(self, dir)?;
        Ok(())
    }
}

/// Directories currently registered for change notification.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    dirs: HashSet<PathBuf>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `dir` was already present.
    pub fn insert(&mut self, dir: PathBuf) -> bool {
        self.dirs.insert(dir)
    }

    /// Returns false if `dir` was not present.
    pub fn remove(&mut self, dir: &Path) -> bool {
        self.dirs.remove(dir)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Registered directories, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.dirs.iter().cloned().collect();
        paths.sort();
        paths
    }
}

/// List `root` and every directory below it that is neither hidden nor
/// deeper than `max_depth`.
///
/// Hidden or too-deep directories are pruned together with their subtree.
/// Symlinked directories are not followed.
/// Failing to list `root` itself is an error; a subdirectory that vanishes
/// mid-walk is skipped.
pub fn list_all_dirs(fs: &dyn FileSystem, root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![root.to_path_buf()];
    let mut stack = vec![root.to_path_buf()];
    let mut first = true;

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if first => return Err(err),
            Err(err) => {
                debug!(dir = ?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };
        first = false;

        let mut children: Vec<PathBuf> = entries
            .into_iter()
            .filter(|p| !fs.is_symlink(p) && fs.is_dir(p))
            .filter(|p| !is_hidden(p))
            .filter(|p| depth_below(root, p).is_some_and(|d| d <= max_depth))
            .collect();
        children.sort();

        // Reverse so the stack pops them in sorted order.
        for child in children.into_iter().rev() {
            dirs.push(child.clone());
            stack.push(child);
        }
    }

    Ok(dirs)
}

/// Owns the watch registry and the [`WatchSet`].
///
/// Only the serial watch pipeline touches this, so nothing here is locked.
pub struct TreeWatcher<R: WatchRegistry> {
    registry: R,
    fs: Arc<dyn FileSystem>,
    max_depth: usize,
    roots: Vec<PathBuf>,
    watched: WatchSet,
}

impl<R: WatchRegistry> std::fmt::Debug for TreeWatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWatcher")
            .field("max_depth", &self.max_depth)
            .field("roots", &self.roots)
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl<R: WatchRegistry> TreeWatcher<R> {
    pub fn new(registry: R, fs: Arc<dyn FileSystem>, max_depth: usize) -> Self {
        Self {
            registry,
            fs,
            max_depth,
            roots: Vec::new(),
            watched: WatchSet::new(),
        }
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watched
    }

    /// Register every qualifying directory under each root.
    ///
    /// A root whose subtree cannot be listed is logged and skipped. Returns
    /// the number of directories newly registered.
    pub fn watch_roots(&mut self, roots: &[PathBuf]) -> usize {
        let mut added = 0;

        for root in roots {
            let root = self.fs.canonicalize(root).unwrap_or_else(|_| root.clone());
            if !self.roots.contains(&root) {
                self.roots.push(root.clone());
            }

            // The listing starts with the root itself.
            let dirs = match list_all_dirs(self.fs.as_ref(), &root, self.max_depth) {
                Ok(dirs) => dirs,
                Err(err) => {
                    warn!(
                        root = ?root,
                        depth = self.max_depth,
                        error = %err,
                        "cannot list watch root; skipping"
                    );
                    continue;
                }
            };

            for dir in dirs {
                if self.register(&dir) {
                    added += 1;
                }
            }
        }

        info!(dirs = self.watched.len(), "watching directories");
        added
    }

    /// React to a directory creation.
    ///
    /// Only `dir` itself is registered; its subdirectories are not walked.
    /// Hidden directories, symlinks and directories deeper than the configured depth
    /// below every root are left alone.
    pub fn add_dir(&mut self, dir: &Path) -> bool {
        if self.watched.contains(dir) {
            return false;
        }
        if is_hidden(dir) {
            debug!(dir = ?dir, "not watching hidden directory");
            return false;
        }
        if self.fs.is_symlink(dir) {
            debug!(dir = ?dir, "not following symlinked directory");
            return false;
        }
        if !self.within_depth(dir) {
            debug!(dir = ?dir, depth = self.max_depth, "not watching directory beyond depth");
            return false;
        }

        let added = self.register(dir);
        if added {
            info!(dir = ?dir, "Add watcher");
        }
        added
    }

    /// React to a directory removal. Unwatch failures are ignored since the
    /// OS usually drops the watch together with the directory.
    pub fn remove_dir(&mut self, dir: &Path) -> bool {
        if !self.watched.remove(dir) {
            return false;
        }
        if let Err(err) = self.registry.unwatch(dir) {
            debug!(dir = ?dir, error = %err, "unwatch failed (directory already gone)");
        }
        info!(dir = ?dir, "Remove watcher");
        true
    }

    fn within_depth(&self, dir: &Path) -> bool {
        // Dirs outside every root (should not happen) are accepted.
        let depths: Vec<usize> = self
            .roots
            .iter()
            .filter_map(|root| depth_below(root, dir))
            .collect();
        depths.is_empty() || depths.iter().any(|&d| d <= self.max_depth)
    }

    fn register(&mut self, dir: &Path) -> bool {
        if self.watched.contains(dir) {
            return false;
        }
        match self.registry.watch(dir) {
            Ok(()) => {
                debug!(dir = ?dir, "Watch directory");
                self.watched.insert(dir.to_path_buf())
            }
            Err(err) => {
                warn!(dir = ?dir, error = %err, "failed to watch directory");
                false
            }
        }
    }
}
