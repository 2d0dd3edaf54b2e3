// src/config/mod.rs

//! Configuration loading and fix-up for fswatch.
//!
//! Responsibilities:
//! - Define the YAML/JSON-backed data model and the fixed model (`model.rs`).
//! - Load a config document from disk (`loader.rs`).
//! - Apply defaults and compile triggers (`validate.rs`).
//! - Parse delay strings (`duration.rs`).
//! - Generate a starter document interactively (`wizard.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;
pub mod wizard;

pub use loader::{load_and_validate, load_from_path};
pub use model::{RawConfig, RawTrigger, Trigger, WatchConfig};
pub use validate::fix_config;
