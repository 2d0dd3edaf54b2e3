// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Registering depth-limited, non-recursive watches on directory trees and
//!   keeping that set current as directories come and go ([`tree`]).
//! - Classifying raw `notify` events and debouncing repeated writes
//!   ([`filter`]).
//! - Compiling per-trigger ignore-file-style patterns ([`patterns`]).
//! - Running the whole thing as one serial task feeding the bus ([`watcher`]).
//!
//! It does **not** know about triggers' commands; it only turns filesystem
//! changes into [`crate::types::FsEvent`]s.

pub mod filter;
pub mod path_utils;
pub mod patterns;
pub mod tree;
pub mod watcher;

pub use filter::{Change, ChangeFilter, DEBOUNCE_WINDOW};
pub use patterns::PatternMatcher;
pub use tree::{list_all_dirs, TreeWatcher, WatchRegistry, WatchSet};
pub use watcher::{spawn_watcher, WatchPipeline};
