// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;

use fswatch::cli::{CliArgs, Command, LogLevel};
use fswatch::logging::{filter_from_env, parse_level_str};
use fswatch::types::ConfigFormat;

#[test]
fn bare_invocation_has_no_subcommand() {
    let args = CliArgs::try_parse_from(["fswatch"]).expect("parse");
    assert!(args.command.is_none());
    assert!(args.config.is_none());
    assert!(!args.dry_run);
}

#[test]
fn start_with_global_flags() {
    let args = CliArgs::try_parse_from([
        "fswatch",
        "start",
        "--config",
        "ci/.fsw.yml",
        "--dry-run",
        "--log-level",
        "debug",
    ])
    .expect("parse");

    assert!(matches!(args.command, Some(Command::Start)));
    assert_eq!(args.config, Some(PathBuf::from("ci/.fsw.yml")));
    assert!(args.dry_run);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
}

#[test]
fn init_accepts_a_format() {
    for (text, expected) in [("yml", ConfigFormat::Yaml), ("yaml", ConfigFormat::Yaml), ("json", ConfigFormat::Json)] {
        let args = CliArgs::try_parse_from(["fswatch", "init", "--format", text]).expect("parse");
        match args.command {
            Some(Command::Init { format }) => assert_eq!(format, Some(expected)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    assert!(CliArgs::try_parse_from(["fswatch", "init", "--format", "toml"]).is_err());
}

#[test]
fn log_level_strings() {
    assert_eq!(parse_level_str(" Warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
}

#[test]
fn log_env_accepts_levels_and_directives() {
    let shown = |v: Option<&str>| filter_from_env(v).to_string().to_lowercase();

    assert_eq!(shown(None), "info");
    assert_eq!(shown(Some("Warning")), "warn");
    assert!(shown(Some("fswatch::watch=trace")).contains("fswatch::watch=trace"));
}

#[test]
fn config_format_from_extension() {
    assert_eq!(ConfigFormat::from_path("a/.fsw.YML".as_ref()), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_path(".fsw.json".as_ref()), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path("Watch.toml".as_ref()), None);
    assert_eq!(ConfigFormat::Json.default_file_name(), ".fsw.json");
}
