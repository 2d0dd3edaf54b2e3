// src/config/duration.rs

//! Duration strings such as `100ms`, `1.5s` or `1m30s`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static WHOLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$")
        .expect("static duration regex")
});

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|μs|ms|s|m|h)").expect("static duration term regex")
});

/// Parse a duration made of one or more `<number><unit>` terms.
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
/// Negative values are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let body = if let Some(rest) = s.strip_prefix('+') {
        rest
    } else if let Some(rest) = s.strip_prefix('-') {
        if rest == "0" {
            return Ok(Duration::ZERO);
        }
        return Err(format!("negative duration '{s}' is not allowed"));
    } else {
        s
    };

    if body == "0" {
        return Ok(Duration::ZERO);
    }

    if !WHOLE.is_match(body) {
        return Err(format!(
            "invalid duration '{s}'; expected e.g. 100ms, 2s, 1m30s (units ns, us, ms, s, m, h)"
        ));
    }

    let mut nanos: f64 = 0.0;
    for cap in TERM.captures_iter(body) {
        let value: f64 = cap[1]
            .parse()
            .map_err(|e| format!("invalid duration number '{}': {}", &cap[1], e))?;
        nanos += value * unit_nanos(&cap[2]);
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("duration '{s}' is out of range"));
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

fn unit_nanos(unit: &str) -> f64 {
    match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1_000.0,
        "ms" => 1_000_000.0,
        "s" => 1_000_000_000.0,
        "m" => 60.0 * 1_000_000_000.0,
        "h" => 3_600.0 * 1_000_000_000.0,
        _ => unreachable!("unit already validated by regex"),
    }
}
