// src/config/wizard.rs

//! Interactive `init`: ask a few questions and save a config document.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::loader::save;
use crate::config::model::{RawConfig, RawTrigger};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::ConfigFormat;

pub const DEFAULT_COMMAND: &str = "go test -v";
pub const DEFAULT_PATTERNS: &[&str] = &["**/*.go", "**/*.c", "**/*.py"];

/// Print `[?] question (default) ` and read one line.
///
/// An empty answer (or EOF) keeps `default`.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: &str,
) -> Result<String> {
    write!(output, "[?] {question} ({default}) ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Ask for a name and a command and build a one-trigger config with every
/// default spelled out.
pub fn generate<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    project_name: &str,
) -> Result<RawConfig> {
    let name = prompt(input, output, "name:", project_name)?;
    let command = prompt(input, output, "command:", DEFAULT_COMMAND)?;

    let mut config = RawConfig {
        description: format!("Auto generated by fswatch [{name}]"),
        triggers: vec![RawTrigger {
            name,
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            env: BTreeMap::from([("DEBUG".to_string(), "1".to_string())]),
            cmd: command,
            delay: None,
            signal: None,
        }],
        watch_paths: Vec::new(),
        watch_depth: None,
    };
    config.apply_defaults();
    Ok(config)
}

/// Full `init` flow: generate, ask for a format, save into `dir`.
///
/// `format` skips the format question when given.
pub fn run_init<R: BufRead, W: Write>(
    fs: &dyn FileSystem,
    input: &mut R,
    output: &mut W,
    dir: &Path,
    format: Option<ConfigFormat>,
) -> Result<PathBuf> {
    let project_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fswatch".to_string());

    let config = generate(input, output, &project_name)?;

    let format = match format {
        Some(f) => f,
        None => {
            let answer = prompt(input, output, "Save format .fsw.(json|yml)", "yml")?;
            // Anything that is not json is saved as yml.
            answer.parse().unwrap_or(ConfigFormat::Yaml)
        }
    };

    let path = save(fs, &config, format, dir)?;
    writeln!(output, "Saved to {:?}", format.default_file_name())?;
    Ok(path)
}
