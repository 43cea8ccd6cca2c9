//! Structural rewriting of test sources before compilation.
//!
//! Two passes run over every syntax tree in a compilation, always in the same
//! order:
//!
//! 1. [`unskip_tests`] removes skip markers so every test case executes.
//! 2. [`capture_traces`] injects trace-capture scaffolding into test-holder
//!    declarations and augments their files' imports.
//!
//! Skip removal runs first: the trace pass decides whether to touch a file by
//! looking for test-holder declarations, and markers removed up front can
//! never be mistaken for anything structural by the second pass.
//!
//! Both passes are pure tree transformations. Each one reads a tree, builds a
//! replacement root, and swaps it into the compilation; nothing is mutated in
//! place and no partial-tree state survives a pass.

pub mod trace_capture;
pub mod unskip;

pub use trace_capture::CaptureTraces;
pub use unskip::UnskipTests;

use syn::fold::Fold;

use crate::syntax::Compilation;

/// Attribute-argument name marking a test case as skipped.
pub const SKIP_ARGUMENT: &str = "Skip";

/// Identifier suffix marking a declaration as a test holder.
///
/// Classification is purely by name, not by trait bounds or annotations, so
/// an unrelated type merely named `...Test` is rewritten too.
pub const TEST_HOLDER_SUFFIX: &str = "Test";

/// Apply both rewrite passes to every tree in the compilation.
pub fn rewrite(compilation: Compilation) -> Compilation {
    capture_traces(unskip_tests(compilation))
}

/// Remove every skip marker from every tree.
pub fn unskip_tests(compilation: Compilation) -> Compilation {
    apply(compilation, &mut UnskipTests)
}

/// Inject trace-capture scaffolding into every tree holding tests.
pub fn capture_traces(compilation: Compilation) -> Compilation {
    apply(compilation, &mut CaptureTraces)
}

fn apply(mut compilation: Compilation, rewriter: &mut impl Fold) -> Compilation {
    for tree in compilation.syntax_trees().to_vec() {
        let root = rewriter.fold_file(tree.root().clone());
        compilation = compilation.replace_syntax_tree(tree.with_root(root));
    }
    compilation
}
