// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FswatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("trigger '{trigger}': invalid delay '{value}': {reason}")]
    InvalidDelay {
        trigger: String,
        value: String,
        reason: String,
    },

    #[error("trigger '{trigger}': unknown signal '{name}'")]
    UnknownSignal { trigger: String, name: String },

    #[error("trigger '{trigger}': invalid pattern list: {reason}")]
    InvalidPattern { trigger: String, reason: String },

    #[error("config file not exists (looked for {0})")]
    ConfigNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FswatchError>;
