//! Run configuration shared across the pipeline.

use std::path::PathBuf;

/// Configuration for a single runner invocation.
///
/// The input directory holds the exercise project description and its source
/// files; the output directory receives the generated build project and the
/// results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Human-readable exercise identifier (for example, `two-fer`).
    pub slug: String,
    /// Directory containing the exercise project description and sources.
    pub input_dir: PathBuf,
    /// Directory that receives build output and `results.json`.
    pub output_dir: PathBuf,
}

impl Options {
    pub fn new(slug: impl Into<String>, input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            slug: slug.into(),
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}
