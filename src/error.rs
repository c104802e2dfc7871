use std::path::PathBuf;

/// Every error rxhandle can produce on the Rust side. The C boundary
/// folds all of these into a null handle; the CLI prints them.
#[derive(Debug)]
pub enum PatternError {
    InvalidPattern {
        pattern: String,
        reason: String,
    },
    InvalidEncoding {
        valid_up_to: usize,
    },
    Config {
        path: Option<PathBuf>,
        reason: String,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern \"{pattern}\": {reason}")
            }
            Self::InvalidEncoding { valid_up_to } => {
                write!(f, "pattern is not valid UTF-8 (valid up to byte {valid_up_to})")
            }
            Self::Config { path, reason } => match path {
                Some(p) => write!(f, "config error in {}: {reason}", p.display()),
                None => write!(f, "config error: {reason}"),
            },
            Self::Io { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PatternError {
    /// CLI exit code. 0 and 1 are reserved for "matched" / "no match".
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 2,
            Self::InvalidPattern { .. } | Self::InvalidEncoding { .. } | Self::Config { .. } => 3,
        }
    }
}
