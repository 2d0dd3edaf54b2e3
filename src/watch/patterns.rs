// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::watch::path_utils::relative_str;

/// Compiled ignore-file-style rules for a single trigger.
///
/// Rules are `.gitignore` lines: `**` crosses directories, `!rule` negates
/// and a trailing `/` only selects directories. Each rule is tried against
/// the path and every parent directory; the last rule that applies wins, so
/// `!vendor/` after `**/*.go` drops `vendor/x.go`.
///
/// Paths are evaluated relative to `root`. Paths outside `root` are matched
/// by their file name only.
#[derive(Clone)]
pub struct PatternMatcher {
    root: PathBuf,
    rules: Vec<String>,
    compiled: Vec<Gitignore>,
}

impl fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("root", &self.root)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl PatternMatcher {
    /// Compile `rules` once. Blank lines and `#` comments never apply.
    pub fn compile(root: impl Into<PathBuf>, rules: &[String]) -> Result<Self> {
        let root = root.into();
        let compiled = rules
            .iter()
            .map(|rule| {
                let mut builder = GitignoreBuilder::new(&root);
                builder
                    .add_line(None, rule)
                    .with_context(|| format!("invalid pattern: {rule}"))?;
                builder
                    .build()
                    .with_context(|| format!("compiling pattern {rule}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root,
            rules: rules.to_vec(),
            compiled,
        })
    }

    /// Returns true if the last rule that applies to `path` (or one of its
    /// parents) is a positive one.
    pub fn matches(&self, path: &Path) -> bool {
        let candidate = match relative_str(&self.root, path) {
            Some(rel) => PathBuf::from(rel),
            None if path.is_relative() => path.to_path_buf(),
            None => match path.file_name() {
                Some(name) => PathBuf::from(name),
                None => return false,
            },
        };

        let candidate = candidate
            .strip_prefix("./")
            .map(Path::to_path_buf)
            .unwrap_or(candidate);
        if candidate.as_os_str().is_empty() || candidate.has_root() {
            return false;
        }

        self.compiled
            .iter()
            .rev()
            .map(|rule| rule.matched_path_or_any_parents(&candidate, false))
            .find(|m| !m.is_none())
            .is_some_and(|m| m.is_ignore())
    }
}
