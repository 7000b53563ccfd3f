//! CLI module for the sample harness
//!
//! ## Commands
//!
//! - `run [root]` - Discover and run samples, print a pass/fail/skip summary
//! - `list [root]` - Print the samples that `run` would execute
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::harness::HarnessError;
use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one sample failed.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The harness itself could not run (bad root, bad pattern).
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        let report = miette::Report::new(err);
        CliError::new(format!("{report:?}"), ExitCode::USAGE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run example scripts as isolated tests, skipping the ones this machine cannot host
#[derive(Parser, Debug)]
#[command(name = "sample-harness")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Run example scripts as isolated tests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Output format for `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// pytest-style console output
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Options shared by `run` and `list`.
#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Directory holding the samples
    #[arg(value_name = "ROOT", default_value = "samples")]
    pub root: PathBuf,
    /// Glob selecting sample files, relative to ROOT
    #[arg(short, long, value_name = "GLOB", default_value = "**/*.py")]
    pub pattern: String,
    /// Only select samples whose relative path contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and run samples
    Run {
        #[command(flatten)]
        select: SelectArgs,
        /// Number of samples to run in parallel
        #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
        jobs: usize,
        /// Per-sample time limit in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Verbose output (timings, captured stdout of failures)
        #[arg(short, long)]
        verbose: bool,
        /// Program used to run every sample (default: chosen by file extension)
        #[arg(long, value_name = "CMD")]
        interpreter: Option<String>,
        /// Extra failure text that marks a sample as skipped (repeatable)
        #[arg(long = "skip-on", value_name = "TEXT")]
        skip_on: Vec<String>,
        /// Do not use the built-in resource-unavailability signatures
        #[arg(long)]
        no_default_signatures: bool,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
    },

    /// List discovered samples without running them
    List {
        #[command(flatten)]
        select: SelectArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            select,
            jobs,
            timeout,
            stop_on_fail,
            verbose,
            interpreter,
            skip_on,
            no_default_signatures,
            format,
        } => {
            let options = commands::RunOptions {
                jobs,
                timeout,
                stop_on_fail,
                verbose,
                interpreter,
                skip_on,
                no_default_signatures,
                format,
            };
            commands::run_samples(&select, &options)
        }
        Command::List { select } => commands::list_samples(&select),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["sample-harness", "run"]).unwrap();
        if let Command::Run {
            select,
            jobs,
            timeout,
            format,
            ..
        } = cli.command
        {
            assert_eq!(select.root, PathBuf::from("samples"));
            assert_eq!(select.pattern, "**/*.py");
            assert_eq!(jobs, 1);
            assert!(timeout.is_none());
            assert_eq!(format, ReportFormat::Console);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "sample-harness",
            "run",
            "python/samples",
            "-k",
            "mps",
            "-j",
            "4",
            "--timeout",
            "120",
            "-x",
            "--skip-on",
            "timeout",
            "--skip-on",
            "Segmentation fault",
            "--format",
            "json",
        ])
        .unwrap();
        if let Command::Run {
            select,
            jobs,
            timeout,
            stop_on_fail,
            skip_on,
            format,
            ..
        } = cli.command
        {
            assert_eq!(select.root, PathBuf::from("python/samples"));
            assert_eq!(select.filter.as_deref(), Some("mps"));
            assert_eq!(jobs, 4);
            assert_eq!(timeout, Some(120.0));
            assert!(stop_on_fail);
            assert_eq!(skip_on, vec!["timeout", "Segmentation fault"]);
            assert_eq!(format, ReportFormat::Json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["sample-harness", "list", "samples", "-p", "state/*.py"]).unwrap();
        if let Command::List { select } = cli.command {
            assert_eq!(select.pattern, "state/*.py");
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["sample-harness"]).is_err());
    }

    #[test]
    fn test_harness_error_maps_to_usage_code() {
        let err = CliError::from(HarnessError::Pattern(String::new()));
        assert_eq!(err.exit_code, ExitCode::USAGE);
        assert!(err.message.contains("invalid sample pattern"));
    }
}
