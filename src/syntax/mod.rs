//! Immutable syntax model for a single pipeline run.
//!
//! A [`Compilation`] aggregates one [`SyntaxTree`] per logical source file
//! together with the options and references needed to build them. Both types
//! are value types: every transformation produces a replacement, never an
//! in-place edit, so rewrite passes cannot share mutable parse-tree state.

pub mod compilation;
pub mod tree;

pub use compilation::{Compilation, MetadataReference, OutputKind};
pub use tree::SyntaxTree;
