use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;

/// A single accepted change, as it travels through the fan-out bus.
///
/// Only the path crosses the bus; whether it was a write, a create or a
/// delete has already been decided by the change filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FsEvent {
    pub path: PathBuf,
}

impl FsEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// On-disk format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    #[value(name = "yml", alias = "yaml")]
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`.yml`, `.yaml`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "yml" | "yaml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Default file name used when saving a document of this format.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ConfigFormat::Yaml => crate::config::loader::CONFIG_YAML,
            ConfigFormat::Json => crate::config::loader::CONFIG_JSON,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => f.write_str("yml"),
            ConfigFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yml" | "yaml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(format!(
                "invalid config format: {other} (expected \"yml\" or \"json\")"
            )),
        }
    }
}
