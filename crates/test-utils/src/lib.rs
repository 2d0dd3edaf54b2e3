pub mod builders;
pub mod fake_registry;
pub mod fake_supervisor;

use std::sync::Once;
use std::time::Duration;

use fswatch::logging::{filter_from_env, LOG_ENV_VAR};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Initialise tracing for tests, once per test binary.
///
/// Output goes through the test writer, so it only shows up for failing tests
/// (or with `-- --nocapture`). The filter is read from the same variable the
/// binary uses, e.g. `FSWATCH_LOG=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref());

        // Another harness may already have installed a subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Poll `cond` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut cond: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
