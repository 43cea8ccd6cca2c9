//! An immutable aggregate over a set of syntax trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::SyntaxTree;

/// Output kind for the built artifact.
///
/// The pipeline always forces [`OutputKind::DynamicLibrary`]: the artifact is
/// loaded in-process by the test executor, never launched as a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    #[default]
    DynamicLibrary,
    Binary,
}

impl OutputKind {
    /// The cargo `crate-type` value for this output kind.
    pub fn crate_type(self) -> Option<&'static str> {
        match self {
            OutputKind::DynamicLibrary => Some("dylib"),
            OutputKind::Binary => None,
        }
    }
}

/// A reference to a prebuilt library the compiled artifact may link against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataReference {
    path: PathBuf,
}

impl MetadataReference {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory to add to the library search path, when the reference has one.
    pub fn search_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

/// An immutable set of syntax trees plus the options needed to build them.
///
/// Invariant: exactly one tree per logical source file. Replacing a tree
/// removes the old entry and inserts the new one atomically; each rewrite
/// stage consumes the previous value and returns a wholly new one.
#[derive(Debug, Clone)]
pub struct Compilation {
    name: String,
    trees: Vec<SyntaxTree>,
    output_kind: OutputKind,
    references: Vec<MetadataReference>,
    dependencies: BTreeMap<String, String>,
}

impl Compilation {
    pub fn new(name: impl Into<String>, trees: Vec<SyntaxTree>) -> Self {
        debug_assert!(
            trees
                .iter()
                .enumerate()
                .all(|(i, t)| trees[..i].iter().all(|seen| seen.file_name() != t.file_name())),
            "one syntax tree per logical source file"
        );
        Self {
            name: name.into(),
            trees,
            output_kind: OutputKind::default(),
            references: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntax_trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn syntax_tree(&self, file_name: &str) -> Option<&SyntaxTree> {
        self.trees.iter().find(|t| t.file_name() == file_name)
    }

    pub fn output_kind(&self) -> OutputKind {
        self.output_kind
    }

    pub fn references(&self) -> &[MetadataReference] {
        &self.references
    }

    /// Crate dependencies of the generated project, name to version spec.
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.dependencies
    }

    pub fn with_output_kind(mut self, output_kind: OutputKind) -> Self {
        self.output_kind = output_kind;
        self
    }

    pub fn with_references(mut self, references: Vec<MetadataReference>) -> Self {
        self.references = references;
        self
    }

    pub fn with_dependencies(mut self, dependencies: BTreeMap<String, String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Swap in a replacement for the tree with the same file name.
    ///
    /// The swap is atomic over the set: the old entry is removed and the new
    /// one takes its slot, so the one-tree-per-file invariant holds on both
    /// sides. A replacement naming an unknown file leaves the set unchanged.
    pub fn replace_syntax_tree(mut self, replacement: SyntaxTree) -> Self {
        if let Some(slot) = self
            .trees
            .iter_mut()
            .find(|t| t.file_name() == replacement.file_name())
        {
            *slot = replacement;
        }
        self
    }
}
