//! Result reporting.
//!
//! Reporting is trait-based so output formats can vary without touching the
//! pipeline: the JSON reporter writes the machine-readable `results.json`,
//! the console reporter prints a human-readable summary.

use std::io;
use std::path::PathBuf;
use std::{fs, path::Path};

use thiserror::Error;

use crate::exec::{RunStatus, TestRun, TestStatus};

/// Errors raised while reporting results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize results")]
    Serialize(#[from] serde_json::Error),
}

/// Consumes a finished run.
pub trait TestReporter {
    fn report(&mut self, run: &TestRun) -> Result<(), ReportError>;
}

/// Writes the run as pretty-printed JSON.
#[derive(Debug)]
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TestReporter for JsonReporter {
    fn report(&mut self, run: &TestRun) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(run)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| ReportError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Prints a colored per-test listing and a summary line.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TestReporter for ConsoleReporter {
    fn report(&mut self, run: &TestRun) -> Result<(), ReportError> {
        for test in &run.tests {
            let status = match test.status {
                TestStatus::Pass => "\x1b[32mPASSED\x1b[0m",
                TestStatus::Fail => "\x1b[31mFAILED\x1b[0m",
                TestStatus::Error => "\x1b[31mERRORED\x1b[0m",
            };
            eprintln!("{} {}", test.name, status);
            if self.verbose {
                if let Some(message) = &test.message {
                    eprintln!("{message}");
                }
            }
        }

        if let Some(message) = &run.message {
            eprintln!("{message}");
        }

        let passed = run.tests.iter().filter(|t| t.status == TestStatus::Pass).count();
        let failed = run.tests.iter().filter(|t| t.status == TestStatus::Fail).count();
        let errored = run.tests.iter().filter(|t| t.status == TestStatus::Error).count();

        let mut parts = Vec::new();
        if passed > 0 {
            parts.push(format!("\x1b[32m{passed} passed\x1b[0m"));
        }
        if failed > 0 {
            parts.push(format!("\x1b[31m{failed} failed\x1b[0m"));
        }
        if errored > 0 {
            parts.push(format!("\x1b[31m{errored} errored\x1b[0m"));
        }
        let summary = if parts.is_empty() {
            "no tests executed".to_string()
        } else {
            parts.join(", ")
        };

        let overall = match run.status {
            RunStatus::Pass => "\x1b[1;32mpass\x1b[0m",
            RunStatus::Fail => "\x1b[1;31mfail\x1b[0m",
            RunStatus::Error => "\x1b[1;31merror\x1b[0m",
        };
        eprintln!("====== {overall}: {summary} ======");
        Ok(())
    }
}

/// Conventional name of the results file inside the output directory.
pub fn results_path(output_dir: &Path) -> PathBuf {
    output_dir.join("results.json")
}
