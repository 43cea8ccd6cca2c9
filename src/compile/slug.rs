//! Slug normalization and project path resolution.
//!
//! An exercise slug is a human-readable identifier such as `two-fer`. The
//! on-disk project description is named after its de-humanized, Pascal-cased
//! form: `two-fer` resolves to `<input-dir>/TwoFer.json`. Normalization is a
//! fixed two-stage pipeline so every slug shape (hyphenated, underscored,
//! spaced, or already Pascal) lands on the same name.

use std::path::PathBuf;

use crate::options::Options;

/// File extension of the exercise project description.
pub const PROJECT_EXTENSION: &str = "json";

/// Collapse a human-readable phrase into a single Pascal-cased word.
///
/// Whitespace-separated words are upper-cased at their first letter and
/// joined. Interior capitals are preserved, so an already-Pascal input passes
/// through unchanged.
pub fn dehumanize(input: &str) -> String {
    input.split_whitespace().map(capitalize).collect()
}

/// Convert a hyphen- or underscore-separated name to Pascal case.
pub fn pascalize(input: &str) -> String {
    input
        .split(['-', '_'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the project description path for a run.
pub fn project_path(options: &Options) -> PathBuf {
    let name = pascalize(&dehumanize(&options.slug));
    options.input_dir.join(format!("{name}.{PROJECT_EXTENSION}"))
}
