use std::fs;
use std::path::Path;

use grep_regex::RegexMatcherBuilder;
use serde::Deserialize;

use crate::error::PatternError;

/// Parser default when no `nest_limit` is configured.
const DEFAULT_NEST_LIMIT: u32 = 250;

/// Nesting the engine adds around a pattern: its own group, plus the
/// anchored group, concatenation and outer group of the full-match form.
const WRAPPER_DEPTH: u32 = 4;

/// Dialect and resource options a pattern is compiled with.
///
/// `Syntax::default()` is the engine's default dialect, which is what the
/// C boundary always uses. The limits bound how large the compiled program
/// may grow, so a pathological pattern is refused at compile time rather
/// than evaluated without bound.
///
/// Read from TOML, every key optional:
///
/// ```toml
/// case_insensitive = true
/// size_limit = 1048576
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Syntax {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub unicode: bool,
    /// Compiled program size limit in bytes.
    pub size_limit: Option<usize>,
    /// Lazy DFA cache limit in bytes.
    pub dfa_size_limit: Option<usize>,
    /// Maximum nesting depth of the pattern syntax tree.
    pub nest_limit: Option<u32>,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            unicode: true,
            size_limit: None,
            dfa_size_limit: None,
            nest_limit: None,
        }
    }
}

impl Syntax {
    pub fn from_toml_str(content: &str) -> Result<Self, PatternError> {
        toml::from_str(content).map_err(|e| PatternError::Config {
            path: None,
            reason: e.message().to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, PatternError> {
        let content = fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            PatternError::Config { reason, .. } => PatternError::Config {
                path: Some(path.to_path_buf()),
                reason,
            },
            other => other,
        })
    }

    pub(crate) fn builder(&self) -> RegexMatcherBuilder {
        let mut builder = RegexMatcherBuilder::new();
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .unicode(self.unicode);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        if let Some(limit) = self.dfa_size_limit {
            builder.dfa_size_limit(limit);
        }
        // The pattern as written is checked against `nest_limit` when it is
        // parsed; the engine only sees it wrapped in groups, so give it room.
        let nest_limit = self.nest_limit.unwrap_or(DEFAULT_NEST_LIMIT);
        builder.nest_limit(nest_limit.saturating_add(WRAPPER_DEPTH));
        builder
    }
}
