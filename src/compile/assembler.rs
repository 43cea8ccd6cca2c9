//! Assembling a compilation from a loaded project.
//!
//! The assembler is the pipeline's only suspension point: it resolves the
//! project description path from the slug, waits on the project loader, then
//! parses every source file into a syntax tree. The resulting compilation
//! carries the trusted library references of the process environment and is
//! forced to a dynamic-library output kind, since the artifact is loaded
//! in-process by the test executor rather than launched as a program.
//!
//! The caller applies both rewrite passes to every tree in the returned
//! compilation before any further use.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::options::Options;
use crate::syntax::{Compilation, OutputKind, SyntaxTree};

use super::loader::{ManifestWorkspace, ProjectLoader};
use super::{CompileError, references, slug};

/// A source file that could not be parsed into a syntax tree.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("failed to parse {file_name}")]
#[diagnostic(code(proctor::parse))]
pub struct ParseError {
    file_name: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{message}")]
    span: SourceSpan,
    message: String,
}

impl ParseError {
    fn new(file_name: &str, source: &str, error: &syn::Error) -> Self {
        let start = position_to_offset(source, error.span().start());
        let end = position_to_offset(source, error.span().end()).max(start);
        let length = (end - start).max(1).min(source.len().saturating_sub(start));
        Self {
            file_name: file_name.to_owned(),
            src: NamedSource::new(file_name, source.to_owned()),
            span: SourceSpan::from((start, length)),
            message: error.to_string(),
        }
    }
}

/// Translate a one-based line / zero-based column position to a byte offset.
fn position_to_offset(source: &str, position: proc_macro2::LineColumn) -> usize {
    if position.line == 0 {
        return 0;
    }
    let mut offset = 0;
    for (index, line) in source.lines().enumerate() {
        if index + 1 == position.line {
            let column = line
                .char_indices()
                .nth(position.column)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return offset + column;
        }
        offset += line.len() + 1;
    }
    source.len()
}

/// Assemble the compilation for a run using the default workspace loader.
pub async fn compile(options: &Options) -> Result<Compilation, CompileError> {
    compile_with(&ManifestWorkspace, options).await
}

/// Assemble the compilation for a run using the given loader.
#[tracing::instrument(skip_all, fields(slug = %options.slug))]
pub async fn compile_with(
    workspace: &impl ProjectLoader,
    options: &Options,
) -> Result<Compilation, CompileError> {
    let path = slug::project_path(options);
    if !path.is_file() {
        return Err(CompileError::ProjectNotFound { path });
    }

    let project = workspace.open_project(&path).await?;
    tracing::info!(name = %project.name, sources = project.sources.len(), "project loaded");

    let mut trees = Vec::with_capacity(project.sources.len());
    for file in &project.sources {
        let tree = SyntaxTree::parse(&file.name, &file.contents)
            .map_err(|err| ParseError::new(&file.name, &file.contents, &err))?;
        trees.push(tree);
    }

    Ok(Compilation::new(project.name, trees)
        .with_dependencies(project.dependencies)
        .with_references(references::trusted_libraries())
        .with_output_kind(OutputKind::DynamicLibrary))
}
