// src/watch/filter.rs

//! Classification and debouncing of raw notify events.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use notify::EventKind;
use notify::event::ModifyKind;
use tracing::trace;

use crate::fs::FileSystem;
use crate::types::FsEvent;
use crate::watch::tree::WatchSet;

/// Notifications for the same path whose modification time is not newer
/// than the last accepted one by more than this are dropped.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// What the pipeline should do with one path of a raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A directory appeared; extend the watch set.
    DirCreated(PathBuf),
    /// A watched directory went away; shrink the watch set.
    DirRemoved(PathBuf),
    /// Forward to the bus.
    Changed(FsEvent),
    /// Debounce duplicate or an event kind we do not react to.
    Ignored,
}

/// Classifies notifications and holds the per-path debounce state.
#[derive(Debug)]
pub struct ChangeFilter {
    fs: Arc<dyn FileSystem>,
    window: Duration,
    last_modified: HashMap<PathBuf, SystemTime>,
}

impl ChangeFilter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_window(fs, DEBOUNCE_WINDOW)
    }

    pub fn with_window(fs: Arc<dyn FileSystem>, window: Duration) -> Self {
        Self {
            fs,
            window,
            last_modified: HashMap::new(),
        }
    }

    /// Decide what one `(kind, path)` pair means.
    pub fn classify(&mut self, kind: &EventKind, path: &Path, watched: &WatchSet) -> Change {
        match kind {
            EventKind::Access(_) => Change::Ignored,
            EventKind::Create(_) if self.fs.is_dir(path) => Change::DirCreated(path.to_path_buf()),
            EventKind::Remove(_) if watched.contains(path) => Change::DirRemoved(path.to_path_buf()),
            EventKind::Modify(ModifyKind::Name(_)) => {
                if watched.contains(path) && !self.fs.is_dir(path) {
                    Change::DirRemoved(path.to_path_buf())
                } else if !watched.contains(path) && self.fs.is_dir(path) {
                    Change::DirCreated(path.to_path_buf())
                } else {
                    self.debounce(path)
                }
            }
            _ => self.debounce(path),
        }
    }

    fn debounce(&mut self, path: &Path) -> Change {
        if self.is_changed(path) {
            Change::Changed(FsEvent::new(path))
        } else {
            trace!(path = ?path, "debounced");
            Change::Ignored
        }
    }

    /// Accept `path` if its modification time is more than the window past
    /// the last accepted one, and remember it.
    ///
    /// A path that cannot be stat'ed (deleted, permission) is accepted and
    /// nothing is recorded.
    pub fn is_changed(&mut self, path: &Path) -> bool {
        let mtime = match self.fs.modified(path) {
            Ok(t) => t,
            Err(_) => return true,
        };

        let accept = match self.last_modified.get(path) {
            None => true,
            Some(last) => mtime
                .duration_since(*last)
                .is_ok_and(|elapsed| elapsed > self.window),
        };

        if accept {
            self.last_modified.insert(path.to_path_buf(), mtime);
        }
        accept
    }

    /// Number of paths with a recorded modification time.
    pub fn tracked(&self) -> usize {
        self.last_modified.len()
    }
}
