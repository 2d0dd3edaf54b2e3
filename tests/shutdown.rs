// tests/shutdown.rs
#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use tokio::sync::oneshot;

use fswatch::config::WatchConfig;
use fswatch::engine::{shutdown, Engine};
use fswatch::exec::ProcessSupervisor;
use fswatch_test_utils::builders::{RawConfigBuilder, RawTriggerBuilder};
use fswatch_test_utils::{init_tracing, wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// Loop until `signal`; the handler takes a while before it records the
/// delivery and exits.
fn slow_trap(dir: &Path, name: &str, signal: &str) -> String {
    let d = dir.display();
    format!(
        "trap 'sleep 0.3; echo {signal} > \"{d}/{name}.stopped\"; exit 0' {signal}; \
         touch \"{d}/{name}.up\"; while true; do sleep 0.05; done"
    )
}

fn two_traps(root: &Path) -> WatchConfig {
    RawConfigBuilder::new()
        .with_trigger(
            RawTriggerBuilder::new("api", &slow_trap(root, "api", "TERM"))
                .pattern("*.go")
                .signal("TERM")
                .build(),
        )
        .with_trigger(
            RawTriggerBuilder::new("worker", &slow_trap(root, "worker", "HUP"))
                .pattern("*.py")
                .build(),
        )
        .build_in(root)
}

async fn both_up(root: &Path) -> bool {
    wait_until(Duration::from_secs(3), || {
        root.join("api.up").exists() && root.join("worker.up").exists()
    })
    .await
}

fn assert_stopped_with_own_signals(root: &Path) -> TestResult {
    // Handlers finished (and recorded their signal) before run_until returned.
    assert_eq!(std::fs::read_to_string(root.join("api.stopped"))?.trim(), "TERM");
    assert_eq!(std::fs::read_to_string(root.join("worker.stopped"))?.trim(), "HUP");
    Ok(())
}

#[tokio::test]
async fn interrupt_stops_every_trigger_before_returning() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    let cfg = two_traps(root);
    let (engine, ingress) = Engine::start(&cfg.triggers, |_| ProcessSupervisor::new());
    assert!(both_up(root).await);

    let (close_tx, close_rx) = oneshot::channel();
    let _ = close_tx.send(());
    with_timeout(engine.run_until(shutdown::closed(close_rx))).await;

    assert_stopped_with_own_signals(root)?;
    drop(ingress);
    Ok(())
}

#[tokio::test]
async fn sigterm_to_fswatch_shuts_down_through_the_listener() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    let cfg = two_traps(root);
    let (engine, ingress) = Engine::start(&cfg.triggers, |_| ProcessSupervisor::new());
    assert!(both_up(root).await);

    let (close_tx, close_rx) = oneshot::channel();
    let listener = shutdown::install(close_tx)?;

    // SAFETY: raise takes a plain signal number, and the listener above has
    // already replaced the default (fatal) SIGTERM disposition.
    let rc = unsafe { libc::raise(libc::SIGTERM) };
    assert_eq!(rc, 0);

    with_timeout(engine.run_until(shutdown::closed(close_rx))).await;

    assert_stopped_with_own_signals(root)?;
    listener.abort();
    drop(ingress);
    Ok(())
}
