//! Pipeline orchestration.
//!
//! One invocation runs one pipeline:
//!
//! ```text
//! NotStarted -> Loaded -> Rewritten -> Compiled -> {Succeeded, Failed}
//! ```
//!
//! The orchestrator assembles the compilation, applies the skip-removal pass
//! and then the trace-capture pass to every tree, emits and builds the
//! rewritten set, and hands the artifact to the test executor. `Failed` is
//! terminal and entered on any fatal error from loading or compiling; no
//! retry happens at this layer. Test failures are data, not pipeline
//! failures: a run whose tests fail still ends in `Succeeded` with the
//! failures recorded in the result.

use thiserror::Error;

use crate::compile::{self, CompileError, EmitError};
use crate::diagnostics;
use crate::exec::{ExecError, TestExecutor, TestRun};
use crate::options::Options;
use crate::rewrite;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Execution(#[from] ExecError),
}

/// Where a pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    Loaded,
    Rewritten,
    Compiled,
    Succeeded,
    Failed,
}

/// A single pipeline run over one exercise.
#[derive(Debug)]
pub struct Pipeline {
    options: Options,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            state: PipelineState::NotStarted,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the pipeline to completion and produce the test run result.
    pub async fn run(&mut self, executor: &impl TestExecutor) -> Result<TestRun, PipelineError> {
        match self.run_inner(executor).await {
            Ok(run) => Ok(run),
            Err(error) => {
                self.state = PipelineState::Failed;
                tracing::warn!(%error, "pipeline failed");
                Err(error)
            }
        }
    }

    async fn run_inner(&mut self, executor: &impl TestExecutor) -> Result<TestRun, PipelineError> {
        let compilation = compile::compile(&self.options).await?;
        self.state = PipelineState::Loaded;
        tracing::info!(name = %compilation.name(), "loaded");

        let compilation = rewrite::rewrite(compilation);
        self.state = PipelineState::Rewritten;
        tracing::info!("rewritten");

        let build_dir = self.options.output_dir.join("build");
        let outcome = compile::emit(&compilation, &build_dir)?;
        self.state = PipelineState::Compiled;
        tracing::info!(diagnostics = outcome.diagnostics.len(), "compiled");

        let usable = outcome
            .artifact
            .as_deref()
            .filter(|_| !diagnostics::has_errors(&outcome.diagnostics));
        let Some(artifact) = usable else {
            self.state = PipelineState::Failed;
            return Ok(TestRun::from_diagnostics(&outcome.diagnostics));
        };

        let outcomes = executor.execute(&build_dir, artifact)?;
        self.state = PipelineState::Succeeded;
        Ok(TestRun::from_outcomes(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ProcessExecutor;

    #[test]
    fn a_fresh_pipeline_has_not_started() {
        let pipeline = Pipeline::new(Options::new("two-fer", "/input", "/output"));
        assert_eq!(pipeline.state(), PipelineState::NotStarted);
    }

    #[tokio::test]
    async fn missing_project_is_a_terminal_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(Options::new("two-fer", dir.path(), dir.path().join("out")));

        let error = pipeline.run(&ProcessExecutor).await.unwrap_err();
        assert!(matches!(
            error,
            PipelineError::Compile(CompileError::ProjectNotFound { .. })
        ));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }
}
