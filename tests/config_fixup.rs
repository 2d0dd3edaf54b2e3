// tests/config_fixup.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fswatch::config::duration::parse_duration;
use fswatch::config::fix_config;
use fswatch::errors::FswatchError;
use fswatch::exec::KillSignal;
use fswatch_test_utils::builders::{RawConfigBuilder, RawTriggerBuilder};

type TestResult = Result<(), Box<dyn Error>>;

const BASE: &str = "/project";

fn one_trigger(trigger: RawTriggerBuilder) -> Result<fswatch::config::WatchConfig, FswatchError> {
    let raw = RawConfigBuilder::new().with_trigger(trigger.build()).raw();
    fix_config(raw, Path::new(BASE))
}

#[test]
fn defaults_are_filled_in() -> TestResult {
    let cfg = one_trigger(RawTriggerBuilder::new("t", "echo hi").pattern("*.go"))?;

    assert_eq!(cfg.watch_paths, vec![PathBuf::from(".")]);
    assert_eq!(cfg.watch_depth, 5);

    let t = &cfg.triggers[0];
    assert_eq!(t.delay_text, "100ms");
    assert_eq!(t.delay, Duration::from_millis(100));
    assert_eq!(t.signal, KillSignal::HUP);
    assert_eq!(t.command, "echo hi");
    Ok(())
}

#[test]
fn explicit_depth_zero_is_kept() -> TestResult {
    let raw = RawConfigBuilder::new()
        .with_trigger(RawTriggerBuilder::new("t", "true").build())
        .watch_depth(0)
        .raw();
    let cfg = fix_config(raw, Path::new(BASE))?;
    assert_eq!(cfg.watch_depth, 0);
    Ok(())
}

#[test]
fn repeated_watch_paths_are_collapsed() -> TestResult {
    let raw = RawConfigBuilder::new()
        .watch_path("src")
        .watch_path("lib")
        .watch_path("src")
        .raw();
    let cfg = fix_config(raw, Path::new(BASE))?;
    assert_eq!(cfg.watch_paths, vec![PathBuf::from("src"), PathBuf::from("lib")]);
    Ok(())
}

#[test]
fn delay_forms() -> TestResult {
    let cases = [
        ("0", Duration::ZERO),
        ("+2s", Duration::from_secs(2)),
        ("1.5s", Duration::from_millis(1500)),
        ("1m30s", Duration::from_secs(90)),
        ("250us", Duration::from_micros(250)),
        ("2h", Duration::from_secs(7200)),
    ];
    for (text, expected) in cases {
        let cfg = one_trigger(RawTriggerBuilder::new("t", "true").delay(text))?;
        assert_eq!(cfg.triggers[0].delay, expected, "delay {text}");
        assert_eq!(cfg.triggers[0].delay_text, text);
    }
    Ok(())
}

#[test]
fn bad_delays_fail_fix_up() {
    for text in ["abc", "10", "-1s", "5 parsecs", "1s2"] {
        let err = one_trigger(RawTriggerBuilder::new("t", "true").delay(text))
            .expect_err("delay should be rejected");
        assert!(
            matches!(err, FswatchError::InvalidDelay { ref value, .. } if value == text),
            "unexpected error for {text}: {err}"
        );
    }
}

#[test]
fn negative_zero_is_zero() {
    assert_eq!(parse_duration("-0"), Ok(Duration::ZERO));
}

#[test]
fn signal_forms() -> TestResult {
    let cases = [
        ("HUP", KillSignal::HUP),
        ("sigterm", KillSignal::TERM),
        ("SIGKILL", KillSignal::KILL),
        (" quit ", KillSignal::QUIT),
        ("Int", KillSignal::INT),
        ("trap", KillSignal::TRAP),
    ];
    for (text, expected) in cases {
        let cfg = one_trigger(RawTriggerBuilder::new("t", "true").signal(text))?;
        assert_eq!(cfg.triggers[0].signal, expected, "signal {text}");
    }

    let numeric: KillSignal = KillSignal::TERM.number().to_string().parse()?;
    assert_eq!(numeric, KillSignal::TERM);
    assert_eq!(KillSignal::TERM.to_string(), "SIGTERM");
    Ok(())
}

#[test]
fn unknown_signal_fails_fix_up() {
    let err = one_trigger(RawTriggerBuilder::new("t", "true").signal("USR1"))
        .expect_err("USR1 is not in the table");
    assert!(matches!(err, FswatchError::UnknownSignal { ref name, .. } if name == "USR1"));
}

#[test]
fn invalid_pattern_fails_fix_up() {
    let err = one_trigger(RawTriggerBuilder::new("t", "true").pattern("src/[unclosed"))
        .expect_err("unclosed class should be rejected");
    assert!(matches!(err, FswatchError::InvalidPattern { ref trigger, .. } if trigger == "t"));
}

#[test]
fn empty_command_is_a_config_error() {
    let err = one_trigger(RawTriggerBuilder::new("t", "   ")).expect_err("empty cmd");
    assert!(matches!(err, FswatchError::ConfigError(_)));
}

#[test]
fn patterns_follow_last_match_wins() -> TestResult {
    let cfg = one_trigger(
        RawTriggerBuilder::new("t", "true")
            .pattern("**/*.go")
            .pattern("!vendor/")
            .pattern("vendor/keep.go"),
    )?;
    let t = &cfg.triggers[0];

    assert!(t.matches(Path::new("/project/main.go")));
    assert!(t.matches(Path::new("/project/pkg/deep/x.go")));
    assert!(!t.matches(Path::new("/project/README.md")));
    assert!(!t.matches(Path::new("/project/vendor/lib/x.go")));
    assert!(t.matches(Path::new("/project/vendor/keep.go")));
    Ok(())
}

#[test]
fn paths_outside_the_base_match_by_file_name() -> TestResult {
    let cfg = one_trigger(RawTriggerBuilder::new("t", "true").pattern("*.py"))?;
    let t = &cfg.triggers[0];

    assert!(t.matches(Path::new("/elsewhere/tool.py")));
    assert!(t.matches(Path::new("./script.py")));
    assert!(!t.matches(Path::new("/elsewhere/tool.rs")));
    Ok(())
}

#[test]
fn no_patterns_match_nothing() -> TestResult {
    let cfg = one_trigger(RawTriggerBuilder::new("t", "true"))?;
    assert!(!cfg.triggers[0].matches(Path::new("/project/main.go")));
    Ok(())
}
