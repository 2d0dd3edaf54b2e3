// src/engine/bus.rs

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::types::FsEvent;

/// Buffer of the single ingress channel.
pub const INGRESS_CAPACITY: usize = 1;
/// Buffer of each per-trigger channel.
pub const EGRESS_CAPACITY: usize = 1;

/// Single-producer, multi-consumer distribution of accepted changes.
///
/// Every event is delivered to every subscriber, in ingress order. A full
/// subscriber channel blocks the bus instead of dropping the event.
#[derive(Debug)]
pub struct FanoutBus {
    ingress: mpsc::Receiver<FsEvent>,
    egress: Vec<mpsc::Sender<FsEvent>>,
}

impl FanoutBus {
    /// Create the bus and the sender side of its ingress.
    pub fn new() -> (Self, mpsc::Sender<FsEvent>) {
        let (tx, rx) = mpsc::channel(INGRESS_CAPACITY);
        (
            Self {
                ingress: rx,
                egress: Vec::new(),
            },
            tx,
        )
    }

    /// Add a subscriber. All subscribers must be added before [`run`].
    ///
    /// [`run`]: FanoutBus::run
    pub fn subscribe(&mut self) -> mpsc::Receiver<FsEvent> {
        let (tx, rx) = mpsc::channel(EGRESS_CAPACITY);
        self.egress.push(tx);
        rx
    }

    pub fn subscribers(&self) -> usize {
        self.egress.len()
    }

    /// Forward events until the ingress is closed, then close every egress.
    ///
    /// The ingress closes when `shutdown` resolves or when every ingress
    /// sender is dropped. Events already buffered in the ingress are still
    /// delivered before the egress channels close.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut closing = false;

        loop {
            tokio::select! {
                _ = &mut shutdown, if !closing => {
                    info!("closing event bus");
                    self.ingress.close();
                    closing = true;
                }
                evt = self.ingress.recv() => match evt {
                    Some(evt) => self.broadcast(evt).await,
                    None => break,
                },
            }
        }

        let n = self.egress.len();
        // Dropping the senders is the close; it happens exactly once here.
        drop(self.egress);
        debug!(subscribers = n, "event bus closed");
    }

    async fn broadcast(&self, evt: FsEvent) {
        for tx in &self.egress {
            if tx.send(evt.clone()).await.is_err() {
                debug!(path = ?evt.path, "subscriber gone; event not delivered");
            }
        }
    }
}
