// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{RawConfig, WatchConfig};
use crate::errors::{FswatchError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::ConfigFormat;

pub const CONFIG_YAML: &str = ".fsw.yml";
pub const CONFIG_JSON: &str = ".fsw.json";

/// Load a config document from a given path and return the raw `RawConfig`.
///
/// The format is chosen from the extension. This only deserializes; use
/// [`load_and_validate`] to apply defaults and compile the triggers.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        FswatchError::ConfigError(format!("unknown format config file: {}", path.display()))
    })?;

    let contents = fs.read_to_string(path)?;
    parse_str(&contents, format)
}

/// Deserialize a document in the given format.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfig> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
        ConfigFormat::Json => serde_json::from_str(contents)?,
    };
    Ok(config)
}

/// Serialize a document in the given format.
pub fn to_string(config: &RawConfig, format: ConfigFormat) -> Result<String> {
    let text = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };
    Ok(text)
}

/// Load a config document from path and fix it up.
///
/// This is the recommended entry point for the rest of the application:
/// - Reads YAML or JSON.
/// - Applies defaults (`delay`, `signal`, `watch_paths`, `watch_depth`).
/// - Parses delays, resolves signals and compiles pattern lists, failing on
///   the first invalid one.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let raw_config = load_from_path(&RealFileSystem, &path)?;
    let config = WatchConfig::try_from(raw_config)?;
    Ok(config)
}

/// Default candidates, in lookup order.
pub fn default_config_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(CONFIG_JSON), PathBuf::from(CONFIG_YAML)]
}

/// First candidate that exists.
pub fn find_config(fs: &dyn FileSystem, candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| fs.exists(p)).cloned()
}

/// Write `config` next to `dir` under the format's default name.
pub fn save(
    fs: &dyn FileSystem,
    config: &RawConfig,
    format: ConfigFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(format.default_file_name());
    let text = to_string(config, format)?;
    fs.write(&path, text.as_bytes())?;
    Ok(path)
}
