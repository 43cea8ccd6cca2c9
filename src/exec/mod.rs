//! Test execution boundary.
//!
//! The pipeline ends by exposing a compiled artifact plus diagnostics; running
//! the tests inside that artifact is the executor's job. The boundary is a
//! trait so execution strategies can change (sandboxing, timeouts, remote
//! runners) without touching orchestration. The default executor launches the
//! generated project's test target in a subprocess and parses the harness
//! output into per-test outcomes.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::io;
use std::path::Path;
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::{self, Diagnostic};

/// Errors raised while executing tests.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to launch the test process")]
    Launch(#[source] io::Error),
}

/// Outcome of one executed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

/// One test's result, as reported downstream.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TestOutcome {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pass,
            message: None,
            output: None,
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Fail,
            message: Some(message.into()),
            output: None,
        }
    }

    pub fn errored(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Error,
            message: Some(message.into()),
            output: None,
        }
    }
}

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pass,
    Fail,
    Error,
}

/// The full result of one runner invocation.
#[derive(Debug, Clone, Serialize)]
pub struct TestRun {
    pub version: u32,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub tests: Vec<TestOutcome>,
}

/// Results format version written to `results.json`.
const RESULTS_VERSION: u32 = 2;

impl TestRun {
    /// A run that executed its tests; overall status follows the outcomes.
    pub fn from_outcomes(outcomes: Vec<TestOutcome>) -> Self {
        let status = if outcomes.iter().any(|o| o.status == TestStatus::Error) {
            RunStatus::Error
        } else if outcomes.iter().any(|o| o.status == TestStatus::Fail) {
            RunStatus::Fail
        } else {
            RunStatus::Pass
        };
        Self {
            version: RESULTS_VERSION,
            status,
            message: None,
            tests: outcomes,
        }
    }

    /// A run that never reached execution because the build failed.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let rendered = diagnostics::render_errors(diagnostics);
        let message = if rendered.is_empty() {
            "the build produced no usable artifact".to_string()
        } else {
            rendered
        };
        Self {
            version: RESULTS_VERSION,
            status: RunStatus::Error,
            message: Some(message),
            tests: Vec::new(),
        }
    }
}

/// Runs the tests inside a compiled artifact.
pub trait TestExecutor {
    fn execute(&self, project_dir: &Path, artifact: &Path) -> Result<Vec<TestOutcome>, ExecError>;
}

/// Default executor: runs the generated project's test target in a subprocess.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl TestExecutor for ProcessExecutor {
    fn execute(&self, project_dir: &Path, _artifact: &Path) -> Result<Vec<TestOutcome>, ExecError> {
        let output = Command::new("cargo")
            .arg("test")
            .current_dir(project_dir)
            .output()
            .map_err(ExecError::Launch)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_harness_output(&stdout))
    }
}

/// Parse harness output lines into per-test outcomes.
///
/// The harness prints one `test <name> ... <status>` line per executed test
/// and, for failures, a `---- <name> stdout ----` section with the panic
/// text. Unrecognized statuses rank as errors so nothing disappears from the
/// results silently.
pub fn parse_harness_output(stdout: &str) -> Vec<TestOutcome> {
    let mut outcomes = Vec::new();

    for line in stdout.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("test ") else {
            continue;
        };
        if rest.starts_with("result:") {
            continue;
        }
        let Some((name, status)) = rest.rsplit_once(" ... ") else {
            continue;
        };
        let outcome = match status {
            "ok" => TestOutcome::passed(name),
            "FAILED" => TestOutcome::failed(name, failure_section(stdout, name)),
            other => TestOutcome::errored(name, format!("unexpected test status: {other}")),
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Extract the failure section printed for a test, if any.
fn failure_section(stdout: &str, name: &str) -> String {
    let header = format!("---- {name} stdout ----");
    let mut section = Vec::new();
    let mut in_section = false;

    for line in stdout.lines() {
        if line.trim() == header {
            in_section = true;
            continue;
        }
        if in_section {
            if line.trim().is_empty() || line.starts_with("---- ") {
                break;
            }
            section.push(line.trim_end());
        }
    }

    if section.is_empty() {
        "test failed".to_string()
    } else {
        section.join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HARNESS_OUTPUT: &str = "\
running 3 tests
test fake_test::add_works ... ok
test fake_test::sub_works ... FAILED
test fake_test::mul_works ... ok

failures:

---- fake_test::sub_works stdout ----
thread 'fake_test::sub_works' panicked at src/fake_test.rs:12:9:
assertion `left == right` failed
  left: 1
  right: 2

failures:
    fake_test::sub_works

test result: FAILED. 2 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out
";

    #[test]
    fn parses_every_executed_test() {
        let outcomes = parse_harness_output(HARNESS_OUTPUT);
        assert_eq!(outcomes.len(), 3);

        assert_eq!(outcomes[0].name, "fake_test::add_works");
        assert_eq!(outcomes[0].status, TestStatus::Pass);

        assert_eq!(outcomes[1].status, TestStatus::Fail);
        let message = outcomes[1].message.as_deref().unwrap();
        assert!(message.contains("assertion `left == right` failed"));

        assert_eq!(outcomes[2].status, TestStatus::Pass);
    }

    #[test]
    fn summary_line_is_not_a_test() {
        let outcomes = parse_harness_output("test result: ok. 1 passed; 0 failed\n");
        assert!(outcomes.is_empty());
    }

    #[test]
    fn run_status_follows_outcomes() {
        let passing = TestRun::from_outcomes(vec![TestOutcome::passed("a"), TestOutcome::passed("b")]);
        assert_eq!(passing.status, RunStatus::Pass);
        assert_eq!(passing.version, 2);

        let failing = TestRun::from_outcomes(vec![
            TestOutcome::passed("a"),
            TestOutcome::failed("b", "assertion failed"),
        ]);
        assert_eq!(failing.status, RunStatus::Fail);

        let errored = TestRun::from_outcomes(vec![TestOutcome::errored("a", "unexpected test status: weird")]);
        assert_eq!(errored.status, RunStatus::Error);
    }

    #[test]
    fn build_failures_become_an_error_run() {
        let run = TestRun::from_diagnostics(&[Diagnostic::error("mismatched types")]);
        assert_eq!(run.status, RunStatus::Error);
        assert!(run.message.as_deref().unwrap().contains("mismatched types"));
        assert!(run.tests.is_empty());

        let empty = TestRun::from_diagnostics(&[]);
        assert!(empty.message.is_some());
    }
}
