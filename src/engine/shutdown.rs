// src/engine/shutdown.rs

//! OS-signal capture and orderly teardown.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Shutdown signal listeners, registered up front.
///
/// Registration happens in [`OsSignals::register`], so a signal delivered
/// right after it returns is never missed.
#[derive(Debug)]
pub struct OsSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl OsSignals {
    /// Listen for Ctrl-C and, on Unix, SIGTERM. Must run inside a runtime.
    pub fn register() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the next signal and return its name.
    pub async fn recv(&mut self) -> std::io::Result<&'static str> {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => Ok("SIGINT"),
                _ = self.terminate.recv() => Ok("SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.map(|_| "CTRL-C")
        }
    }
}

/// Register the signal listeners and spawn the task that fires `close` on
/// the first one.
///
/// Commands that ignore their termination signal would keep the process
/// alive forever, so a second signal exits immediately. Failing to register
/// the listeners is returned to the caller.
pub fn install(close: oneshot::Sender<()>) -> std::io::Result<JoinHandle<()>> {
    let mut signals = OsSignals::register()?;

    Ok(tokio::spawn(async move {
        match signals.recv().await {
            Ok(name) => info!(signal = name, "Catch signal!"),
            Err(e) => {
                // Keep `close` alive: dropping it would read as a shutdown.
                warn!(error = %e, "signal listener failed; only the bus closing ends the run");
                std::future::pending::<()>().await;
            }
        }
        if close.send(()).is_err() {
            return;
        }

        if let Ok(name) = signals.recv().await {
            warn!(signal = name, "second signal; exiting without waiting for commands");
            std::process::exit(1);
        }
    }))
}

/// Future that resolves when `close` fires (or its sender is dropped).
pub async fn closed(close: oneshot::Receiver<()>) {
    let _ = close.await;
}

/// Wait for every trigger engine to finish.
pub async fn join_triggers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "trigger engine task failed");
        }
    }
}
