// src/engine/trigger.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Trigger;
use crate::exec::Supervisor;
use crate::types::FsEvent;

/// Lifecycle of one trigger engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Running,
    Stopping,
    Terminated,
}

/// Restart-on-matching-change loop for a single trigger.
///
/// Starts the command immediately, restarts it (stop, delay, start) for
/// every matching event, and stops it when the event channel closes.
pub struct TriggerEngine<S: Supervisor> {
    trigger: Arc<Trigger>,
    events: mpsc::Receiver<FsEvent>,
    supervisor: S,
    state: TriggerState,
}

impl<S: Supervisor> fmt::Debug for TriggerEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerEngine")
            .field("trigger", &self.trigger.name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: Supervisor> TriggerEngine<S> {
    pub fn new(trigger: Arc<Trigger>, events: mpsc::Receiver<FsEvent>, supervisor: S) -> Self {
        Self {
            trigger,
            events,
            supervisor,
            state: TriggerState::Idle,
        }
    }

    /// Main loop; returns once the channel is closed and the command has
    /// exited.
    pub async fn run(mut self) {
        self.start();

        while let Some(evt) = self.events.recv().await {
            if !self.trigger.matches(&evt.path) {
                debug!(trigger = %self.trigger.name, path = ?evt.path, "no match");
                continue;
            }

            self.stop();
            info!(trigger = %self.trigger.name, path = ?evt.path, "changed");
            info!(trigger = %self.trigger.name, delay = %self.trigger.delay_text, "delay");
            sleep(self.trigger.delay).await;
            self.start();
        }

        self.stop();
        self.supervisor.wait_stopped().await;
        self.transition(TriggerState::Terminated);
        debug!(trigger = %self.trigger.name, "trigger engine finished");
    }

    fn start(&mut self) {
        // A failed start leaves the engine alive; the next match retries.
        if let Err(err) = self.supervisor.start(&self.trigger) {
            error!(trigger = %self.trigger.name, error = %format!("{err:#}"), "failed to start command");
        }
        self.transition(TriggerState::Running);
    }

    fn stop(&mut self) {
        self.transition(TriggerState::Stopping);
        self.supervisor.stop(&self.trigger);
    }

    fn transition(&mut self, next: TriggerState) {
        if self.state != next {
            debug!(trigger = %self.trigger.name, from = ?self.state, to = ?next, "state");
            self.state = next;
        }
    }
}
