// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::duration::parse_duration;
use crate::config::model::{
    RawConfig, RawTrigger, Trigger, WatchConfig, DEFAULT_DELAY, DEFAULT_SIGNAL,
    DEFAULT_WATCH_DEPTH,
};
use crate::errors::{FswatchError, Result};
use crate::exec::signal::KillSignal;
use crate::watch::patterns::PatternMatcher;

impl TryFrom<RawConfig> for WatchConfig {
    type Error = FswatchError;

    /// Fix the config relative to the current working directory.
    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        let base_dir = std::env::current_dir()?;
        fix_config(raw, &base_dir)
    }
}

/// Apply defaults and compile `raw` into a [`WatchConfig`].
///
/// Patterns are evaluated relative to `base_dir`. Any invalid delay, signal
/// or pattern list fails the whole config.
pub fn fix_config(mut raw: RawConfig, base_dir: &Path) -> Result<WatchConfig> {
    raw.apply_defaults();

    let triggers = raw
        .triggers
        .iter()
        .map(|t| fix_trigger(t, base_dir).map(Arc::new))
        .collect::<Result<Vec<_>>>()?;

    Ok(WatchConfig {
        description: raw.description,
        watch_paths: unique_paths(&raw.watch_paths),
        watch_depth: raw.watch_depth.unwrap_or(DEFAULT_WATCH_DEPTH),
        triggers,
    })
}

fn fix_trigger(raw: &RawTrigger, base_dir: &Path) -> Result<Trigger> {
    if raw.cmd.trim().is_empty() {
        return Err(FswatchError::ConfigError(format!(
            "trigger '{}' has an empty `cmd`",
            raw.name
        )));
    }

    let delay_text = raw.delay.clone().unwrap_or_else(|| DEFAULT_DELAY.to_string());
    let delay = parse_duration(&delay_text).map_err(|reason| FswatchError::InvalidDelay {
        trigger: raw.name.clone(),
        value: delay_text.clone(),
        reason,
    })?;

    let signal_text = raw.signal.as_deref().unwrap_or(DEFAULT_SIGNAL);
    let signal: KillSignal = signal_text
        .parse()
        .map_err(|_| FswatchError::UnknownSignal {
            trigger: raw.name.clone(),
            name: signal_text.to_string(),
        })?;

    let matcher = PatternMatcher::compile(base_dir, &raw.patterns).map_err(|err| {
        FswatchError::InvalidPattern {
            trigger: raw.name.clone(),
            reason: format!("{err:#}"),
        }
    })?;

    Ok(Trigger {
        name: raw.name.clone(),
        patterns: raw.patterns.clone(),
        env: raw.env.clone(),
        command: raw.cmd.clone(),
        delay_text,
        delay,
        signal,
        matcher,
    })
}

/// Drop repeated watch paths, keeping first-seen order.
fn unique_paths(paths: &[String]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for p in paths {
        let p = PathBuf::from(p);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
