// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::exec::signal::KillSignal;
use crate::watch::patterns::PatternMatcher;

pub const DEFAULT_DELAY: &str = "100ms";
pub const DEFAULT_SIGNAL: &str = "HUP";
pub const DEFAULT_WATCH_PATH: &str = ".";
pub const DEFAULT_WATCH_DEPTH: usize = 5;

/// Config document as read from `.fsw.yml` / `.fsw.json`.
///
/// ```yaml
/// desc: Auto generated by fswatch [demo]
/// triggers:
/// - name: demo
///   pattens: ["**/*.go"]
///   env: { DEBUG: "1" }
///   cmd: go test -v
///   delay: 100ms
///   signal: HUP
/// watch_paths: ["."]
/// watch_depth: 5
/// ```
///
/// Every field is optional; [`RawConfig::apply_defaults`] fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, rename = "desc")]
    pub description: String,

    #[serde(default)]
    pub triggers: Vec<RawTrigger>,

    #[serde(default)]
    pub watch_paths: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_depth: Option<usize>,
}

/// One entry of `triggers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrigger {
    #[serde(default)]
    pub name: String,

    /// Ignore-file-style rules. Older documents spell the key `pattens`.
    #[serde(default, rename = "pattens", alias = "patterns")]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub cmd: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

impl RawConfig {
    /// Fill in every optional field with its documented default.
    pub fn apply_defaults(&mut self) {
        for trigger in self.triggers.iter_mut() {
            trigger.apply_defaults();
        }
        if self.watch_paths.is_empty() {
            self.watch_paths.push(DEFAULT_WATCH_PATH.to_string());
        }
        if self.watch_depth.is_none() {
            self.watch_depth = Some(DEFAULT_WATCH_DEPTH);
        }
    }
}

impl RawTrigger {
    pub fn apply_defaults(&mut self) {
        if self.delay.as_deref().is_none_or(|d| d.trim().is_empty()) {
            self.delay = Some(DEFAULT_DELAY.to_string());
        }
        if self.signal.as_deref().is_none_or(|s| s.trim().is_empty()) {
            self.signal = Some(DEFAULT_SIGNAL.to_string());
        }
    }
}

/// Fixed, validated configuration the engine runs from.
///
/// Built once by [`crate::config::validate::fix_config`]; never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub description: String,
    pub watch_paths: Vec<PathBuf>,
    pub watch_depth: usize,
    pub triggers: Vec<Arc<Trigger>>,
}

/// A trigger with its patterns compiled, delay parsed and signal resolved.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub name: String,
    pub patterns: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub command: String,
    /// The delay as written in the document, for log output.
    pub delay_text: String,
    pub delay: Duration,
    pub signal: KillSignal,
    pub(crate) matcher: PatternMatcher,
}

impl Trigger {
    /// Whether a changed path is selected by this trigger's rules.
    pub fn matches(&self, path: &Path) -> bool {
        self.matcher.matches(path)
    }
}
