//! Project loading.
//!
//! The pipeline does not own a build graph; it consumes a loader that turns a
//! resolved project path into a dependency table and a source file set. The
//! default loader reads a JSON project description:
//!
//! ```json
//! {
//!     "name": "two_fer",
//!     "sources": ["two_fer.rs", "two_fer_test.rs"],
//!     "dependencies": { "trace_capture": "0.3" }
//! }
//! ```
//!
//! Source paths are resolved relative to the description's directory. Load
//! failures are fatal to the run; nothing here is retried or repaired.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while opening a project.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid project description {path}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The on-disk project description.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDescription {
    /// Crate name of the generated project.
    pub name: String,
    /// Source files, relative to the description's directory.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Crate dependencies of the generated project, name to version spec.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// One loaded source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

/// A loaded project: its description plus the contents of every source file.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub dependencies: BTreeMap<String, String>,
    pub sources: Vec<SourceFile>,
}

/// Turns a resolved project path into a loaded project.
#[allow(async_fn_in_trait)]
pub trait ProjectLoader {
    async fn open_project(&self, path: &Path) -> Result<Project, LoadError>;
}

/// Default loader reading the JSON project description from disk.
#[derive(Debug, Default)]
pub struct ManifestWorkspace;

impl ProjectLoader for ManifestWorkspace {
    async fn open_project(&self, path: &Path) -> Result<Project, LoadError> {
        let manifest = tokio::fs::read_to_string(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let description: ProjectDescription =
            serde_json::from_str(&manifest).map_err(|source| LoadError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;

        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let mut sources = Vec::with_capacity(description.sources.len());
        for name in &description.sources {
            let source_path = root.join(name);
            let contents = tokio::fs::read_to_string(&source_path)
                .await
                .map_err(|source| LoadError::Io {
                    path: source_path.clone(),
                    source,
                })?;
            sources.push(SourceFile {
                name: name.clone(),
                contents,
            });
        }

        Ok(Project {
            name: description.name,
            dependencies: description.dependencies,
            sources,
        })
    }
}
