#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions, // Rust naming conventions
    clippy::missing_errors_doc,      // every error is a PatternError, documented there
    clippy::missing_panics_doc,      // same
)]

pub mod config;
pub mod error;
pub mod ffi;
pub mod pattern;
pub mod types;

pub use config::Syntax;
pub use error::PatternError;
pub use pattern::Pattern;
pub use types::MatchMode;

/// Compile `source` under `syntax` and test every subject with `mode`.
/// Results come back in subject order.
pub fn test_all<S: AsRef<[u8]>>(
    source: &str,
    syntax: &Syntax,
    mode: MatchMode,
    subjects: &[S],
) -> Result<Vec<bool>, PatternError> {
    let pattern = Pattern::with_syntax(source, syntax)?;
    Ok(subjects
        .iter()
        .map(|s| pattern.test(s.as_ref(), mode))
        .collect())
}
