// src/engine/mod.rs

//! Orchestration engine for fswatch.
//!
//! This module ties together:
//! - the fan-out bus that copies every accepted change to every trigger
//! - one restart loop per trigger, each owning its own supervisor
//! - shutdown: OS signals close the bus, which ends every trigger loop
//!
//! Event production (the file watcher) lives in [`crate::watch`]; the
//! engine only sees [`FsEvent`]s arriving on the ingress sender returned
//! by [`Engine::start`].

pub mod bus;
pub mod shutdown;
pub mod trigger;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Trigger;
use crate::exec::Supervisor;
use crate::types::FsEvent;

pub use bus::FanoutBus;
pub use trigger::{TriggerEngine, TriggerState};

/// Running trigger engines plus the (not yet started) bus feeding them.
#[derive(Debug)]
pub struct Engine {
    bus: FanoutBus,
    triggers: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Spawn one engine per trigger and return the bus ingress.
    ///
    /// Every trigger's command is started right away. Must be called from
    /// within a tokio runtime.
    pub fn start<S, F>(triggers: &[Arc<Trigger>], mut make_supervisor: F) -> (Self, mpsc::Sender<FsEvent>)
    where
        S: Supervisor + 'static,
        F: FnMut(&Trigger) -> S,
    {
        let (mut bus, ingress) = FanoutBus::new();

        let handles = triggers
            .iter()
            .map(|trigger| {
                let events = bus.subscribe();
                let supervisor = make_supervisor(trigger);
                let engine = TriggerEngine::new(Arc::clone(trigger), events, supervisor);
                debug!(trigger = %trigger.name, "spawning trigger engine");
                tokio::spawn(engine.run())
            })
            .collect();

        (
            Self {
                bus,
                triggers: handles,
            },
            ingress,
        )
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Run the bus until `shutdown` resolves (or all ingress senders drop),
    /// then wait for every trigger engine to stop its command.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let Engine { bus, triggers } = self;

        tokio::join!(
            async {
                bus.run(shutdown).await;
                info!("Kill all running ...");
            },
            shutdown::join_triggers(triggers),
        );

        info!("Done");
    }
}
