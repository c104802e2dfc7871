use grep_matcher::Matcher;
use grep_regex::RegexMatcher;
use regex_syntax::ast::parse::ParserBuilder;
use regex_syntax::ast::print::Printer;

use crate::config::Syntax;
use crate::error::PatternError;
use crate::types::MatchMode;

/// A compiled pattern, owned exclusively by whoever holds it.
///
/// Both matching semantics are compiled up front: `search` finds the
/// pattern anywhere, `full` is the same pattern pinned to both ends of the
/// subject. A `Pattern` only exists if compilation succeeded.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    search: RegexMatcher,
    full: RegexMatcher,
}

impl Pattern {
    /// Compile with the engine's default dialect.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        Self::with_syntax(source, &Syntax::default())
    }

    pub fn with_syntax(source: &str, syntax: &Syntax) -> Result<Self, PatternError> {
        let builder = syntax.builder();
        let invalid = |e: &dyn std::fmt::Display| PatternError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        };

        // The raw source must parse on its own: `a)(b` only looks valid
        // once wrapped in a group.
        let printed = printed_source(source, syntax).map_err(|e| invalid(&e))?;

        let search = builder.build(&printed).map_err(|e| invalid(&e))?;
        let full = builder
            .build(&format!(r"\A(?:{printed})\z"))
            .map_err(|e| invalid(&e))?;

        Ok(Self {
            source: source.to_string(),
            search,
            full,
        })
    }

    /// Compile from raw bytes, as handed over a foreign boundary.
    /// An embedded NUL is part of the pattern, not a terminator.
    pub fn from_bytes(source: &[u8], syntax: &Syntax) -> Result<Self, PatternError> {
        let source = std::str::from_utf8(source).map_err(|e| PatternError::InvalidEncoding {
            valid_up_to: e.valid_up_to(),
        })?;
        Self::with_syntax(source, syntax)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the entire subject matches, end to end.
    #[must_use]
    pub fn is_full_match(&self, subject: &[u8]) -> bool {
        evaluate(&self.full, subject)
    }

    /// True if some substring of the subject matches.
    #[must_use]
    pub fn is_match(&self, subject: &[u8]) -> bool {
        evaluate(&self.search, subject)
    }

    #[must_use]
    pub fn test(&self, subject: &[u8], mode: MatchMode) -> bool {
        match mode {
            MatchMode::Full => self.is_full_match(subject),
            MatchMode::Search => self.is_match(subject),
        }
    }
}

/// An evaluation error reads as "no match".
fn evaluate(matcher: &RegexMatcher, subject: &[u8]) -> bool {
    matcher.is_match(subject).unwrap_or(false)
}

/// The source re-printed from its syntax tree. Both matchers are built
/// from this rather than the raw text: the engine and the anchored form
/// wrap the pattern in groups, and a trailing `(?x)` comment would swallow
/// the closing parenthesis. Printing drops comments.
///
/// `nest_limit` is checked here, against the pattern as written, so the
/// wrapping groups never count against it.
fn printed_source(source: &str, syntax: &Syntax) -> Result<String, regex_syntax::ast::Error> {
    let mut parser = ParserBuilder::new();
    if let Some(limit) = syntax.nest_limit {
        parser.nest_limit(limit);
    }
    let ast = parser.build().parse(source)?;

    let mut printed = String::with_capacity(source.len());
    // Writing into a String cannot fail.
    let _ = Printer::new().print(&ast, &mut printed);
    Ok(printed)
}
