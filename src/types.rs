use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How a subject is evaluated against a compiled pattern. The two are not
/// interchangeable: `ab` against `xaby` is false under `Full`, true under
/// `Search`. Callers always pick one by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole subject must match, end to end.
    #[default]
    Full,
    /// Some contiguous substring of the subject must match.
    Search,
}

impl MatchMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "search" | "partial" => Ok(Self::Search),
            other => Err(format!("unknown match mode: {other}. Use: full, search")),
        }
    }
}
