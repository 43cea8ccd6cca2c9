//! Command-line interface for the runner.
//!
//! ## Usage
//!
//! ```text
//! proctor <SLUG> <INPUT_DIR> <OUTPUT_DIR> [-v]
//! ```
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! `execute()` returns `CliResult<ExitCode>` instead of calling
//! `process::exit`. Only the top-level `run()` function handles errors and
//! exits. A run whose tests fail still exits 0: failures are recorded in
//! `results.json`, and a nonzero exit is reserved for faults of the runner
//! itself (bad arguments, unresolvable project, I/O errors).

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::compile::CompileError;
use crate::exec::ProcessExecutor;
use crate::options::Options;
use crate::pipeline::{Pipeline, PipelineError};
use crate::report::{ConsoleReporter, JsonReporter, TestReporter, results_path};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
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

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test runner for exercise submissions
#[derive(Parser, Debug)]
#[command(name = "proctor")]
#[command(version = VERSION)]
#[command(about = "Rewrites, compiles, and executes an exercise test suite", long_about = None)]
pub struct Cli {
    /// Exercise slug (for example, two-fer)
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Directory containing the exercise project description and sources
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving build output and results.json
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Print per-test failure details
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. `execute()`
/// returns `CliResult` and errors are handled here.
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

/// Execute the run and report results.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = Options::new(cli.slug, cli.input_dir, cli.output_dir);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting the runtime: {e}")))?;

    let mut pipeline = Pipeline::new(options.clone());
    let run = runtime
        .block_on(pipeline.run(&ProcessExecutor))
        .map_err(|e| CliError::failure(render_fatal(e)))?;

    JsonReporter::new(results_path(&options.output_dir))
        .report(&run)
        .map_err(|e| CliError::failure(format!("Error writing results: {e}")))?;
    ConsoleReporter::new(cli.verbose)
        .report(&run)
        .map_err(|e| CliError::failure(format!("Error reporting results: {e}")))?;

    Ok(ExitCode::SUCCESS)
}

/// Render a fatal pipeline error for the terminal.
///
/// Parse failures carry source context and go through the fancy diagnostic
/// renderer; everything else prints as a plain error chain.
fn render_fatal(error: PipelineError) -> String {
    match error {
        PipelineError::Compile(CompileError::Parse(parse)) => {
            format!("{:?}", miette::Report::new(parse))
        }
        other => format!("Error: {other}"),
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
    fn test_cli_parse_positional_arguments() {
        let cli = Cli::try_parse_from(["proctor", "two-fer", "/input", "/output"]).unwrap();
        assert_eq!(cli.slug, "two-fer");
        assert_eq!(cli.input_dir, PathBuf::from("/input"));
        assert_eq!(cli.output_dir, PathBuf::from("/output"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_verbose_flag() {
        let cli = Cli::try_parse_from(["proctor", "two-fer", "/input", "/output", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_all_positional_arguments() {
        assert!(Cli::try_parse_from(["proctor", "two-fer"]).is_err());
        assert!(Cli::try_parse_from(["proctor"]).is_err());
    }

    #[test]
    fn test_cli_error_constructors() {
        let err = CliError::failure("boom");
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert_eq!(err.to_string(), "boom");
    }
}
