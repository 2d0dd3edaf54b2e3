// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::ConfigFormat;

/// Command-line arguments for `fswatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fswatch",
    version,
    about = "Watch a directory tree and restart commands when matching files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config document (YAML or JSON).
    ///
    /// Default: `.fsw.json`, then `.fsw.yml`, in the current directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FSWATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and fix the config, print it, but don't watch or run anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactively generate a config document in the current directory.
    Init {
        /// Save format; asked interactively when omitted.
        #[arg(long, value_enum)]
        format: Option<ConfigFormat>,
    },
    /// Watch and run the configured triggers.
    Start,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
