//! A parsed representation of one source file.

use syn::File;

/// An immutable parsed source file.
///
/// Structural edits never mutate a tree in place; a pass builds a new root
/// and swaps it in with [`SyntaxTree::with_root`], keeping the file name.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file_name: String,
    root: File,
}

impl SyntaxTree {
    /// Parse a source file into a tree.
    pub fn parse(file_name: impl Into<String>, source: &str) -> syn::Result<Self> {
        Ok(Self {
            file_name: file_name.into(),
            root: syn::parse_file(source)?,
        })
    }

    /// Build a tree from an already-parsed root.
    pub fn from_root(file_name: impl Into<String>, root: File) -> Self {
        Self {
            file_name: file_name.into(),
            root,
        }
    }

    /// File name this tree was parsed from (for example, `two_fer_test.rs`).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Module stem derived from the file name (`two_fer_test.rs` -> `two_fer_test`).
    pub fn module_name(&self) -> &str {
        self.file_name.strip_suffix(".rs").unwrap_or(&self.file_name)
    }

    pub fn root(&self) -> &File {
        &self.root
    }

    /// Replace the whole root, producing a new tree with the same file name.
    pub fn with_root(self, root: File) -> Self {
        Self {
            file_name: self.file_name,
            root,
        }
    }

    /// Render the tree back to formatted source text.
    pub fn to_source(&self) -> String {
        prettyplease::unparse(&self.root)
    }
}
