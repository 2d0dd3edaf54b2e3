// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands defined in
//! the triggers, using `tokio::process::Command`, and for stopping them with
//! the configured signal.
//!
//! - [`backend`] provides the `Supervisor` trait and the concrete
//!   `ProcessSupervisor` the trigger engines use in production.
//! - [`process`] spawns a command and its detached exit waiter.
//! - [`signal`] resolves signal names into [`signal::KillSignal`]s.

pub mod backend;
pub mod process;
pub mod signal;

pub use backend::{ProcessSupervisor, Supervisor};
pub use process::{spawn_process, ProcessHandle};
pub use signal::KillSignal;
