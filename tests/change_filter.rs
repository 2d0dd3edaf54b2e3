// tests/change_filter.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use notify::event::{CreateKind, DataChange, Flag, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tokio::sync::mpsc;

use fswatch::engine::Engine;
use fswatch::fs::mock::MockFileSystem;
use fswatch::fs::{FileSystem, RealFileSystem};
use fswatch::types::FsEvent;
use fswatch::watch::{Change, ChangeFilter, TreeWatcher, WatchPipeline, WatchSet};
use fswatch_test_utils::builders::{RawConfigBuilder, RawTriggerBuilder};
use fswatch_test_utils::fake_registry::RecordingRegistry;
use fswatch_test_utils::fake_supervisor::{FakeSupervisor, SupervisorLog};
use fswatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn at(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000) + Duration::from_millis(ms)
}

fn write_event(path: &str) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(PathBuf::from(path))
}

fn pipeline(fs: &MockFileSystem) -> (WatchPipeline<RecordingRegistry>, RecordingRegistry) {
    let registry = RecordingRegistry::new();
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let tree = TreeWatcher::new(registry.clone(), Arc::clone(&shared), 5);
    let filter = ChangeFilter::new(shared);
    let mut pipeline = WatchPipeline::new(tree, filter, vec![PathBuf::from("/p")]);
    pipeline.watch_roots();
    (pipeline, registry)
}

#[test]
fn second_write_within_window_is_dropped() {
    let fs = MockFileSystem::new();
    fs.add_file_modified("/p/main.go", "package main", at(0));
    let mut filter = ChangeFilter::new(Arc::new(fs.clone()));
    let kind = EventKind::Modify(ModifyKind::Data(DataChange::Content));
    let watched = WatchSet::new();
    let path = Path::new("/p/main.go");

    assert_eq!(
        filter.classify(&kind, path, &watched),
        Change::Changed(FsEvent::new(path))
    );

    fs.touch(path, at(10));
    assert_eq!(filter.classify(&kind, path, &watched), Change::Ignored);

    // Exactly at the window boundary is still a duplicate.
    fs.touch(path, at(100));
    assert_eq!(filter.classify(&kind, path, &watched), Change::Ignored);

    fs.touch(path, at(101));
    assert_eq!(
        filter.classify(&kind, path, &watched),
        Change::Changed(FsEvent::new(path))
    );
    assert_eq!(filter.tracked(), 1);
}

#[test]
fn older_mtime_is_dropped() {
    let fs = MockFileSystem::new();
    fs.add_file_modified("/p/a.c", "", at(500));
    let mut filter = ChangeFilter::new(Arc::new(fs.clone()));

    assert!(filter.is_changed(Path::new("/p/a.c")));
    fs.touch("/p/a.c", at(0));
    assert!(!filter.is_changed(Path::new("/p/a.c")));
}

#[test]
fn unstatable_paths_are_forwarded_and_not_recorded() {
    let fs = MockFileSystem::new();
    let mut filter = ChangeFilter::new(Arc::new(fs));
    let kind = EventKind::Remove(RemoveKind::File);

    let gone = Path::new("/p/deleted.go");
    assert_eq!(
        filter.classify(&kind, gone, &WatchSet::new()),
        Change::Changed(FsEvent::new(gone))
    );
    assert_eq!(
        filter.classify(&kind, gone, &WatchSet::new()),
        Change::Changed(FsEvent::new(gone))
    );
    assert_eq!(filter.tracked(), 0);
}

#[test]
fn directory_events_are_classified() {
    let fs = MockFileSystem::new();
    fs.add_dir("/p/new");
    let mut filter = ChangeFilter::new(Arc::new(fs.clone()));

    let mut watched = WatchSet::new();
    assert_eq!(
        filter.classify(&EventKind::Create(CreateKind::Folder), Path::new("/p/new"), &watched),
        Change::DirCreated(PathBuf::from("/p/new"))
    );

    watched.insert(PathBuf::from("/p/old"));
    assert_eq!(
        filter.classify(&EventKind::Remove(RemoveKind::Folder), Path::new("/p/old"), &watched),
        Change::DirRemoved(PathBuf::from("/p/old"))
    );

    assert_eq!(
        filter.classify(
            &EventKind::Access(notify::event::AccessKind::Any),
            Path::new("/p/new"),
            &watched
        ),
        Change::Ignored
    );
}

#[test]
fn renames_move_watches() {
    let fs = MockFileSystem::new();
    fs.add_dir("/p/before");
    let (mut pipeline, registry) = pipeline(&fs);
    let rename = || EventKind::Modify(ModifyKind::Name(notify::event::RenameMode::Any));

    fs.remove("/p/before");
    fs.add_dir("/p/after");
    let out = pipeline.handle(&Event::new(rename()).add_path(PathBuf::from("/p/before")));
    assert!(out.is_empty());
    let out = pipeline.handle(&Event::new(rename()).add_path(PathBuf::from("/p/after")));
    assert!(out.is_empty());

    assert_eq!(registry.unwatched(), vec![PathBuf::from("/p/before")]);
    assert!(pipeline.tree().watch_set().contains(Path::new("/p/after")));
}

#[test]
fn pipeline_tracks_directories_and_forwards_files() {
    let fs = MockFileSystem::new();
    fs.add_file_modified("/p/main.go", "", at(0));
    let (mut pipeline, registry) = pipeline(&fs);
    assert_eq!(registry.watched(), vec![PathBuf::from("/p")]);

    fs.add_dir("/p/pkg");
    let out = pipeline.handle(
        &Event::new(EventKind::Create(CreateKind::Folder)).add_path(PathBuf::from("/p/pkg")),
    );
    assert!(out.is_empty());
    assert!(pipeline.tree().watch_set().contains(Path::new("/p/pkg")));

    let out = pipeline.handle(&write_event("/p/main.go"));
    assert_eq!(out, vec![FsEvent::new("/p/main.go")]);

    fs.remove("/p/pkg");
    let out = pipeline.handle(
        &Event::new(EventKind::Remove(RemoveKind::Folder)).add_path(PathBuf::from("/p/pkg")),
    );
    assert!(out.is_empty());
    assert!(!pipeline.tree().watch_set().contains(Path::new("/p/pkg")));
}

#[test]
fn rescan_flag_rewalks_the_roots() {
    let fs = MockFileSystem::new();
    let (mut pipeline, registry) = pipeline(&fs);

    // Created while events were being dropped.
    fs.add_dir("/p/missed/inner");
    let out = pipeline.handle(&Event::new(EventKind::Other).set_flag(Flag::Rescan));
    assert!(out.is_empty());

    assert_eq!(
        registry.watched(),
        vec![
            PathBuf::from("/p"),
            PathBuf::from("/p/missed"),
            PathBuf::from("/p/missed/inner"),
        ]
    );
}

#[test]
fn real_file_mtimes_drive_the_debounce() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("main.go");
    let file = std::fs::File::create(&path)?;
    file.set_modified(at(0))?;

    let mut filter = ChangeFilter::new(Arc::new(RealFileSystem));
    assert!(filter.is_changed(&path));

    file.set_modified(at(10))?;
    assert!(!filter.is_changed(&path));

    file.set_modified(at(1_000))?;
    assert!(filter.is_changed(&path));
    Ok(())
}

#[tokio::test]
async fn burst_of_writes_restarts_once() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file_modified("/p/main.go", "", at(0));
    let (pipeline, _registry) = pipeline(&fs);

    let cfg = RawConfigBuilder::new()
        .with_trigger(
            RawTriggerBuilder::new("build", "go build")
                .pattern("*.go")
                .delay("0")
                .build(),
        )
        .build_in("/p");

    let log = SupervisorLog::new();
    let (engine, ingress) = Engine::start(&cfg.triggers, |_| FakeSupervisor::new(log.clone()));

    let (raw_tx, raw_rx) = mpsc::unbounded_channel();
    let watch = tokio::spawn(pipeline.run(raw_rx, ingress));

    raw_tx.send(Ok(write_event("/p/main.go")))?;
    fs.touch("/p/main.go", at(10));
    raw_tx.send(Ok(write_event("/p/main.go")))?;
    drop(raw_tx);

    // The pipeline ends with its input, which drops the last ingress sender
    // and lets the bus and the trigger engine finish.
    let (watched, ()) = with_timeout(async {
        tokio::join!(watch, engine.run_until(std::future::pending()))
    })
    .await;
    watched?;

    assert_eq!(log.starts("build"), 2);
    assert_eq!(log.stops("build"), 2);
    assert_eq!(log.max_live(), 1);
    Ok(())
}
