use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use rxhandle::{MatchMode, PatternError, Syntax};

/// rxhandle: compile a pattern once, test subjects against it.
/// Subjects come from the arguments, or one per line on stdin.
#[derive(Parser)]
#[command(
    name = "rxhandle",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RXHANDLE_BUILD_COMMIT"), ")"),
    about
)]
struct Cli {
    /// Pattern to compile.
    pattern: Option<String>,

    /// Subjects to test. Reads stdin lines when omitted.
    subjects: Vec<String>,

    /// full: the whole subject must match. search: any substring may match.
    #[arg(long, default_value = "full")]
    mode: MatchMode,

    /// Treat the pattern as a literal string.
    #[arg(short = 'F', long)]
    fixed_strings: bool,

    /// Case-insensitive matching (overrides the config file).
    #[arg(short, long)]
    ignore_case: bool,

    /// TOML file with dialect options and size limits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Machine-readable JSON output, one object per subject.
    #[arg(long)]
    json: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let _ = env_logger::try_init();
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "rxhandle", &mut io::stdout());
        return;
    }

    let Some(ref pattern) = cli.pattern else {
        eprintln!("usage: rxhandle <pattern> [subject]... [--mode full|search] [--config FILE]");
        process::exit(3);
    };

    match run(&cli, pattern) {
        Ok(all_matched) => process::exit(i32::from(!all_matched)),
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

/// Returns whether every subject matched.
fn run(cli: &Cli, pattern: &str) -> Result<bool, PatternError> {
    let mut syntax = match cli.config {
        Some(ref path) => Syntax::load(path)?,
        None => Syntax::default(),
    };
    if cli.ignore_case {
        syntax.case_insensitive = true;
    }

    let source = if cli.fixed_strings {
        regex_syntax::escape(pattern)
    } else {
        pattern.to_string()
    };

    let subjects: Vec<Vec<u8>> = if cli.subjects.is_empty() {
        read_stdin_lines()?
    } else {
        cli.subjects.iter().map(|s| s.as_bytes().to_vec()).collect()
    };

    let results = rxhandle::test_all(&source, &syntax, cli.mode, &subjects)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (subject, matched) in subjects.iter().zip(&results) {
        let line = if cli.json {
            serde_json::json!({
                "subject": String::from_utf8_lossy(subject),
                "matched": matched,
                "mode": cli.mode,
            })
            .to_string()
        } else {
            let verdict = if *matched { "match" } else { "no match" };
            format!("{}\t{verdict}", String::from_utf8_lossy(subject))
        };
        // Broken pipe: the reader went away, stop quietly.
        if writeln!(out, "{line}").is_err() {
            break;
        }
    }

    Ok(results.iter().all(|&m| m))
}

fn read_stdin_lines() -> Result<Vec<Vec<u8>>, PatternError> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().split(b'\n') {
        let mut line = line.map_err(|source| PatternError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}
