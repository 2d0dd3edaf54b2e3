// src/logging.rs

//! Logging setup for `fswatch` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` on the command line
//! 2. `FSWATCH_LOG`: a bare level (`debug`, `warning`) or a full
//!    `EnvFilter` directive string (`fswatch::watch=trace,info`)
//! 3. `info`
//!
//! Everything goes to stderr so it never interleaves with a command's stdout.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "FSWATCH_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => filter_for(level_from_log_level(lvl)),
        None => filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

/// Build the filter for an `FSWATCH_LOG` value (or its absence).
///
/// Unparseable directive strings fall back to `info`.
pub fn filter_from_env(value: Option<&str>) -> EnvFilter {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return filter_for(tracing::Level::INFO);
    };

    if let Some(level) = parse_level_str(raw) {
        return filter_for(level);
    }
    EnvFilter::try_new(raw).unwrap_or_else(|_| filter_for(tracing::Level::INFO))
}

fn filter_for(level: tracing::Level) -> EnvFilter {
    EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Bare level names, case-insensitive. `warning` is accepted for `warn`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
