// src/exec/signal.rs

//! Name → signal table for the per-trigger termination signal.

use std::fmt;
use std::str::FromStr;

#[cfg(unix)]
mod sys {
    pub const SIGINT: i32 = libc::SIGINT;
    pub const SIGHUP: i32 = libc::SIGHUP;
    pub const SIGQUIT: i32 = libc::SIGQUIT;
    pub const SIGTRAP: i32 = libc::SIGTRAP;
    pub const SIGTERM: i32 = libc::SIGTERM;
    pub const SIGKILL: i32 = libc::SIGKILL;
}

// Only used for naming/parsing; delivery falls back to a plain kill.
#[cfg(not(unix))]
mod sys {
    pub const SIGINT: i32 = 2;
    pub const SIGHUP: i32 = 1;
    pub const SIGQUIT: i32 = 3;
    pub const SIGTRAP: i32 = 5;
    pub const SIGTERM: i32 = 15;
    pub const SIGKILL: i32 = 9;
}

const SIGNALS: &[(&str, i32)] = &[
    ("INT", sys::SIGINT),
    ("HUP", sys::SIGHUP),
    ("QUIT", sys::SIGQUIT),
    ("TRAP", sys::SIGTRAP),
    ("TERM", sys::SIGTERM),
    ("KILL", sys::SIGKILL),
];

/// A resolved termination signal.
///
/// Accepts `HUP`, `SIGHUP` or the numeric value (`1`), case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KillSignal {
    name: &'static str,
    number: i32,
}

impl KillSignal {
    pub const INT: KillSignal = KillSignal::new("INT", sys::SIGINT);
    pub const HUP: KillSignal = KillSignal::new("HUP", sys::SIGHUP);
    pub const QUIT: KillSignal = KillSignal::new("QUIT", sys::SIGQUIT);
    pub const TRAP: KillSignal = KillSignal::new("TRAP", sys::SIGTRAP);
    pub const TERM: KillSignal = KillSignal::new("TERM", sys::SIGTERM);
    pub const KILL: KillSignal = KillSignal::new("KILL", sys::SIGKILL);

    const fn new(name: &'static str, number: i32) -> Self {
        Self { name, number }
    }

    /// Short name without the `SIG` prefix, e.g. `"HUP"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw signal number for the host platform.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Every signal in the table.
    pub fn all() -> impl Iterator<Item = KillSignal> {
        SIGNALS.iter().map(|&(name, number)| KillSignal::new(name, number))
    }
}

impl Default for KillSignal {
    fn default() -> Self {
        KillSignal::HUP
    }
}

impl fmt::Display for KillSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG{}", self.name)
    }
}

impl FromStr for KillSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let bare = upper.strip_prefix("SIG").unwrap_or(&upper);

        if let Some(sig) = KillSignal::all().find(|sig| sig.name == bare) {
            return Ok(sig);
        }

        if let Ok(number) = bare.parse::<i32>() {
            if let Some(sig) = KillSignal::all().find(|sig| sig.number == number) {
                return Ok(sig);
            }
        }

        let known: Vec<&str> = SIGNALS.iter().map(|(name, _)| *name).collect();
        Err(format!(
            "unknown signal '{}' (expected one of {})",
            s.trim(),
            known.join(", ")
        ))
    }
}
