use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{anyhow, Result};
use fswatch::config::Trigger;
use fswatch::exec::Supervisor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorAction {
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub trigger: String,
    pub action: SupervisorAction,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct LogInner {
    entries: Vec<Recorded>,
    live: HashMap<String, usize>,
    max_live: usize,
}

/// Shared record of everything every `FakeSupervisor` was asked to do.
#[derive(Debug, Clone, Default)]
pub struct SupervisorLog {
    inner: Arc<Mutex<LogInner>>,
}

impl SupervisorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().entries.clone()
    }

    /// Actions recorded for one trigger, in order.
    pub fn actions(&self, trigger: &str) -> Vec<SupervisorAction> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|r| r.trigger == trigger)
            .map(|r| r.action)
            .collect()
    }

    pub fn starts(&self, trigger: &str) -> usize {
        self.count(trigger, SupervisorAction::Start)
    }

    pub fn stops(&self, trigger: &str) -> usize {
        self.count(trigger, SupervisorAction::Stop)
    }

    /// Instances of `trigger` currently considered running.
    pub fn live(&self, trigger: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .live
            .get(trigger)
            .copied()
            .unwrap_or(0)
    }

    /// Highest number of simultaneously live instances of any one trigger.
    pub fn max_live(&self) -> usize {
        self.inner.lock().unwrap().max_live
    }

    fn count(&self, trigger: &str, action: SupervisorAction) -> usize {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|r| r.trigger == trigger && r.action == action)
            .count()
    }

    fn record(&self, trigger: &str, action: SupervisorAction) {
        let mut inner = self.inner.lock().unwrap();
        let live = inner.live.entry(trigger.to_string()).or_insert(0);
        match action {
            SupervisorAction::Start => *live += 1,
            SupervisorAction::Stop => *live = live.saturating_sub(1),
        }
        let live = *live;
        inner.max_live = inner.max_live.max(live);
        inner.entries.push(Recorded {
            trigger: trigger.to_string(),
            action,
            at: Instant::now(),
        });
    }
}

/// A supervisor that runs nothing and records start/stop calls.
///
/// Unlike the real one, `start` does not stop a previous instance, so a
/// caller that forgets to stop shows up as `max_live() > 1`.
#[derive(Debug)]
pub struct FakeSupervisor {
    log: SupervisorLog,
    running: bool,
    fail_start: bool,
}

impl FakeSupervisor {
    pub fn new(log: SupervisorLog) -> Self {
        Self {
            log,
            running: false,
            fail_start: false,
        }
    }

    /// Every `start` returns an error and records nothing.
    pub fn failing(log: SupervisorLog) -> Self {
        Self {
            log,
            running: false,
            fail_start: true,
        }
    }
}

impl Supervisor for FakeSupervisor {
    fn start(&mut self, trigger: &Trigger) -> Result<()> {
        if self.fail_start {
            return Err(anyhow!("simulated start failure for '{}'", trigger.name));
        }
        self.running = true;
        self.log.record(&trigger.name, SupervisorAction::Start);
        Ok(())
    }

    fn stop(&mut self, trigger: &Trigger) {
        if self.running {
            self.running = false;
            self.log.record(&trigger.name, SupervisorAction::Stop);
        }
    }
}
