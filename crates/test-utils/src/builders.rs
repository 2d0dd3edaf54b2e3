#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use fswatch::config::{fix_config, RawConfig, RawTrigger, WatchConfig};

/// Builder for `RawConfig` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfig,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfig::default(),
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.config.description = desc.to_string();
        self
    }

    pub fn with_trigger(mut self, trigger: RawTrigger) -> Self {
        self.config.triggers.push(trigger);
        self
    }

    pub fn watch_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config
            .watch_paths
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn watch_depth(mut self, depth: usize) -> Self {
        self.config.watch_depth = Some(depth);
        self
    }

    pub fn raw(self) -> RawConfig {
        self.config
    }

    /// Fix the config with patterns relative to `base_dir`.
    pub fn build_in(self, base_dir: impl AsRef<Path>) -> WatchConfig {
        fix_config(self.config, base_dir.as_ref())
            .expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawTrigger`.
pub struct RawTriggerBuilder {
    trigger: RawTrigger,
}

impl RawTriggerBuilder {
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            trigger: RawTrigger {
                name: name.to_string(),
                patterns: vec![],
                env: BTreeMap::new(),
                cmd: cmd.to_string(),
                delay: None,
                signal: None,
            },
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.trigger.patterns.push(pattern.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.trigger.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn delay(mut self, delay: &str) -> Self {
        self.trigger.delay = Some(delay.to_string());
        self
    }

    pub fn signal(mut self, signal: &str) -> Self {
        self.trigger.signal = Some(signal.to_string());
        self
    }

    pub fn build(self) -> RawTrigger {
        self.trigger
    }
}
