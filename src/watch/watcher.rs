// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::FsEvent;
use crate::watch::filter::{Change, ChangeFilter};
use crate::watch::tree::{TreeWatcher, WatchRegistry};

/// The serial tree-watcher → change-filter stage.
///
/// Owns the watch set and the debounce state; one event is handled at a
/// time, so per-path ordering is preserved.
#[derive(Debug)]
pub struct WatchPipeline<R: WatchRegistry> {
    tree: TreeWatcher<R>,
    filter: ChangeFilter,
    roots: Vec<PathBuf>,
}

impl<R: WatchRegistry> WatchPipeline<R> {
    pub fn new(tree: TreeWatcher<R>, filter: ChangeFilter, roots: Vec<PathBuf>) -> Self {
        Self {
            tree,
            filter,
            roots,
        }
    }

    /// Register the initial watch set.
    pub fn watch_roots(&mut self) -> usize {
        self.tree.watch_roots(&self.roots)
    }

    pub fn tree(&self) -> &TreeWatcher<R> {
        &self.tree
    }

    /// Apply one raw event and return the changes to forward to the bus.
    pub fn handle(&mut self, event: &Event) -> Vec<FsEvent> {
        if event.need_rescan() {
            warn!("watcher reported dropped events; rescanning watch roots");
            self.tree.watch_roots(&self.roots);
        }

        let mut forward = Vec::new();
        for path in &event.paths {
            match self.filter.classify(&event.kind, path, self.tree.watch_set()) {
                Change::DirCreated(dir) => {
                    self.tree.add_dir(&dir);
                }
                Change::DirRemoved(dir) => {
                    self.tree.remove_dir(&dir);
                }
                Change::Changed(evt) => forward.push(evt),
                Change::Ignored => {}
            }
        }
        forward
    }

    /// Consume raw events until the notify side or the bus ingress closes.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
        ingress: mpsc::Sender<FsEvent>,
    ) {
        while let Some(res) = events.recv().await {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, "file watch error");
                    continue;
                }
            };
            debug!(?event, "received notify event");

            for evt in self.handle(&event) {
                if ingress.send(evt).await.is_err() {
                    debug!("bus ingress closed; watch pipeline stopping");
                    return;
                }
            }
        }
        debug!("watch pipeline finished");
    }
}

/// Start watching the configured roots and spawn the pipeline task.
///
/// The returned task owns the `notify` watcher; watching stops when it ends.
pub fn spawn_watcher(
    cfg: &WatchConfig,
    fs: Arc<dyn FileSystem>,
    ingress: mpsc::Sender<FsEvent>,
) -> Result<JoinHandle<()>> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Receiver gone means the pipeline has stopped.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let tree = TreeWatcher::new(watcher, Arc::clone(&fs), cfg.watch_depth);
    let filter = ChangeFilter::new(fs);
    let mut pipeline = WatchPipeline::new(tree, filter, cfg.watch_paths.clone());
    pipeline.watch_roots();

    info!(roots = ?cfg.watch_paths, depth = cfg.watch_depth, "file watcher started");

    Ok(tokio::spawn(pipeline.run(event_rx, ingress)))
}
