//! Project loading, assembly, and emission.
//!
//! This module owns everything between a slug on the command line and a
//! compiled artifact with diagnostics:
//!
//! - `slug` resolves the project description path from the exercise slug.
//! - `loader` turns that path into a dependency table and source file set.
//! - `references` enumerates the trusted libraries of the process environment.
//! - `assembler` produces the [`Compilation`](crate::syntax::Compilation) the
//!   rewrite passes consume.
//! - `emit` writes the rewritten tree set out as a generated library project,
//!   builds it, and collects typed diagnostics.
//!
//! Resolution and load failures are fatal to the whole run and propagate
//! unchanged; compiler complaints become [`Diagnostic`](crate::diagnostics::Diagnostic)
//! values instead.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod assembler;
pub mod emit;
pub mod loader;
pub mod references;
pub mod slug;

use std::path::PathBuf;

use thiserror::Error;

pub use assembler::{ParseError, compile, compile_with};
pub use emit::{EmitError, EmitOutcome, emit};
pub use loader::{LoadError, ManifestWorkspace, Project, ProjectDescription, ProjectLoader, SourceFile};

/// Fatal errors raised while assembling a compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The slug did not resolve to an existing project description.
    #[error("project description not found: {path}")]
    ProjectNotFound { path: PathBuf },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
