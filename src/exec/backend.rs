// src/exec/backend.rs

//! Pluggable process supervisor abstraction.
//!
//! A trigger engine talks to a `Supervisor` instead of spawning processes
//! directly. This makes it easy to swap in a fake supervisor in tests while
//! keeping the production implementation in [`super::process`].
//!
//! - `ProcessSupervisor` is the default implementation used by `fswatch`.
//!   It spawns the command through the shell and signals its process group.
//! - Tests can provide their own `Supervisor` that, for example, records
//!   start/stop calls and counts how many instances are live.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Trigger;
use crate::exec::process::{spawn_process, ProcessHandle};

/// Start/stop control over one trigger's command.
///
/// Each supervisor is owned by exactly one trigger engine.
pub trait Supervisor: Send {
    /// Start a new instance of `trigger`'s command.
    fn start(&mut self, trigger: &Trigger) -> Result<()>;

    /// Stop the current instance, if any.
    ///
    /// No-op when nothing was started or the process already exited.
    /// Does not wait for the process to go away.
    fn stop(&mut self, trigger: &Trigger);

    /// Resolves once every stopped instance has actually exited.
    ///
    /// Only awaited on shutdown; restarts never wait for the old instance.
    fn wait_stopped(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(std::future::ready(()))
    }
}

/// Real supervisor used in production.
#[derive(Debug, Default)]
pub struct ProcessSupervisor {
    current: Option<ProcessHandle>,
    // Signalled but possibly still running (e.g. inside a trap handler).
    stopping: Vec<ProcessHandle>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an instance is started and has not been seen exiting.
    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(ProcessHandle::is_running)
    }
}

impl Supervisor for ProcessSupervisor {
    fn start(&mut self, trigger: &Trigger) -> Result<()> {
        // Never leave a previous instance behind.
        self.stop(trigger);
        self.current = Some(spawn_process(trigger)?);
        Ok(())
    }

    fn stop(&mut self, trigger: &Trigger) {
        self.stopping.retain(ProcessHandle::is_running);

        let Some(mut handle) = self.current.take() else {
            return;
        };

        if handle.terminate(trigger.signal) {
            info!(trigger = %trigger.name, signal = %trigger.signal, "program terminated");
            self.stopping.push(handle);
        } else {
            debug!(trigger = %trigger.name, "program already exited");
        }
    }

    fn wait_stopped(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let pending = std::mem::take(&mut self.stopping);
        Box::pin(async move {
            for handle in pending {
                handle.wait().await;
            }
        })
    }
}
