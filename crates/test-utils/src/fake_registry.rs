use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use fswatch::watch::WatchRegistry;

/// A `WatchRegistry` that records calls instead of talking to the OS.
///
/// Clones share state, so a test keeps one handle while the tree watcher
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistry {
    watched: Arc<Mutex<Vec<PathBuf>>>,
    unwatched: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch(dir)` fail.
    pub fn fail_on(&self, dir: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(dir.into());
    }

    /// Every successful `watch` call, in order.
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().clone()
    }

    pub fn unwatched(&self) -> Vec<PathBuf> {
        self.unwatched.lock().unwrap().clone()
    }
}

impl WatchRegistry for RecordingRegistry {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        if self.failing.lock().unwrap().contains(dir) {
            return Err(anyhow!("simulated watch failure: {:?}", dir));
        }
        self.watched.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, dir: &Path) -> Result<()> {
        self.unwatched.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
