// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::loader::{default_config_paths, find_config, load_and_validate};
use crate::config::wizard::run_init;
use crate::config::WatchConfig;
use crate::engine::{shutdown, Engine};
use crate::errors::FswatchError;
use crate::exec::ProcessSupervisor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::ConfigFormat;
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// Without a subcommand, an existing config means `start` and a missing one
/// means `init`. A config that exists but does not load is an error.
pub async fn run(args: CliArgs) -> Result<()> {
    match &args.command {
        Some(Command::Init { format }) => init(*format),
        Some(Command::Start) => start(&args).await,
        None => {
            let found = args.config.is_some()
                || find_config(&RealFileSystem, &default_config_paths()).is_some();
            if found {
                start(&args).await
            } else {
                info!("no config found; generating one");
                init(None)
            }
        }
    }
}

/// Run the interactive wizard in the current directory.
fn init(format: Option<ConfigFormat>) -> Result<()> {
    let dir = std::env::current_dir()?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let path = run_init(
        &RealFileSystem,
        &mut stdin.lock(),
        &mut stdout.lock(),
        &dir,
        format,
    )?;
    debug!(path = ?path, "config saved");
    Ok(())
}

async fn start(args: &CliArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config.clone())?;
    info!(config = ?config_path, "loading config");
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    watch_and_run(cfg).await
}

fn resolve_config_path(explicit: Option<PathBuf>) -> errors::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let candidates = default_config_paths();
    find_config(&RealFileSystem, &candidates).ok_or_else(|| {
        let names: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        FswatchError::ConfigNotFound(names.join(", "))
    })
}

/// Wire engine, watcher and signal handling, and run until shutdown.
///
/// - every trigger starts its command immediately
/// - the watcher feeds accepted changes into the bus
/// - Ctrl-C / SIGTERM closes the bus; each trigger then stops its command
pub async fn watch_and_run(cfg: WatchConfig) -> Result<()> {
    let (close_tx, close_rx) = oneshot::channel();
    let listener = shutdown::install(close_tx).context("installing signal handlers")?;

    let (engine, ingress) = Engine::start(&cfg.triggers, |_| ProcessSupervisor::new());
    info!(triggers = engine.trigger_count(), "engine started");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let watcher = match spawn_watcher(&cfg, fs, ingress) {
        Ok(handle) => handle,
        Err(e) => {
            // The ingress sender is gone, so the bus closes right away and
            // every started command is stopped before we report the error.
            engine.run_until(std::future::ready(())).await;
            listener.abort();
            return Err(e.into());
        }
    };

    engine.run_until(shutdown::closed(close_rx)).await;

    watcher.abort();
    listener.abort();
    Ok(())
}

/// Print the fixed configuration without running anything.
fn print_dry_run(cfg: &WatchConfig) {
    println!("fswatch dry-run");
    if !cfg.description.is_empty() {
        println!("  desc: {}", cfg.description);
    }
    println!("  watch_paths: {:?}", cfg.watch_paths);
    println!("  watch_depth: {}", cfg.watch_depth);
    println!();

    println!("triggers ({}):", cfg.triggers.len());
    for trigger in &cfg.triggers {
        println!("  - {}", trigger.name);
        println!("      cmd: {}", trigger.command);
        println!("      patterns: {:?}", trigger.patterns);
        if !trigger.env.is_empty() {
            println!("      env: {:?}", trigger.env);
        }
        println!("      delay: {} ({:?})", trigger.delay_text, trigger.delay);
        println!("      signal: {}", trigger.signal);
    }

    debug!("dry-run complete (no execution)");
}
