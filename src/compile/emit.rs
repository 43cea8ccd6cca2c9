//! Emission of a rewritten compilation.
//!
//! Generates:
//! - Cargo.toml with the project's dependency table and the forced library
//!   output kind
//! - one module file per syntax tree plus a root that declares them
//! - invokes cargo and parses its JSON message stream into typed diagnostics
//!   and the built artifact path

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Severity, SourceLocation};
use crate::syntax::{Compilation, MetadataReference};
use crate::version::PROCTOR_VERSION;

/// Errors raised while emitting the generated project.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write generated project to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch the build")]
    Launch(#[source] io::Error),
}

/// Result of building the generated project.
#[derive(Debug, Default)]
pub struct EmitOutcome {
    /// Path of the built library, when the build produced one.
    pub artifact: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Write the generated project for a compilation and build it.
#[tracing::instrument(skip_all, fields(name = %compilation.name(), trees = compilation.syntax_trees().len()))]
pub fn emit(compilation: &Compilation, out_dir: &Path) -> Result<EmitOutcome, EmitError> {
    write_project(compilation, out_dir).map_err(|source| EmitError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    build(compilation, out_dir)
}

/// Write Cargo.toml, one module per tree, and the root module.
pub fn write_project(compilation: &Compilation, out_dir: &Path) -> io::Result<()> {
    let src_dir = out_dir.join("src");
    fs::create_dir_all(&src_dir)?;

    fs::write(out_dir.join("Cargo.toml"), generate_cargo_toml(compilation))?;

    for tree in compilation.syntax_trees() {
        fs::write(src_dir.join(tree.file_name()), tree.to_source())?;
    }

    let has_own_root = compilation.syntax_trees().iter().any(|t| t.file_name() == "lib.rs");
    if !has_own_root {
        fs::write(src_dir.join("lib.rs"), generate_lib_root(compilation))?;
    }

    Ok(())
}

fn generate_cargo_toml(compilation: &Compilation) -> String {
    let dependencies = if compilation.dependencies().is_empty() {
        "# No additional dependencies".to_string()
    } else {
        compilation
            .dependencies()
            .iter()
            .map(|(name, spec)| format!("{name} = \"{spec}\""))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let crate_type = match compilation.output_kind().crate_type() {
        Some(kind) => format!("\ncrate-type = [\"{kind}\"]"),
        None => String::new(),
    };

    format!(
        r#"[package]
name = "{name}"
version = "{version}"
edition = "2021"

# Generated by proctor

[dependencies]
{dependencies}

[lib]
name = "{name}"
path = "src/lib.rs"{crate_type}
"#,
        name = compilation.name(),
        version = PROCTOR_VERSION,
        dependencies = dependencies,
        crate_type = crate_type,
    )
}

fn generate_lib_root(compilation: &Compilation) -> String {
    let mut root = format!("// Generated by proctor v{PROCTOR_VERSION}\n\n");
    for tree in compilation.syntax_trees() {
        root.push_str(&format!("pub mod {};\n", tree.module_name()));
    }
    root
}

fn build(compilation: &Compilation, out_dir: &Path) -> Result<EmitOutcome, EmitError> {
    let mut command = Command::new("cargo");
    command.arg("build").arg("--message-format=json").current_dir(out_dir);
    if let Some(flags) = library_search_flags(compilation.references()) {
        command.env("RUSTFLAGS", flags);
    }

    let output = command.output().map_err(EmitError::Launch)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_build_output(compilation.name(), &stdout))
}

/// `-L` flags for every trusted reference directory, merged with any flags
/// already present in the environment.
fn library_search_flags(references: &[MetadataReference]) -> Option<String> {
    let mut dirs: Vec<&Path> = references.iter().filter_map(MetadataReference::search_dir).collect();
    dirs.dedup();
    if dirs.is_empty() {
        return None;
    }

    let mut flags = env::var("RUSTFLAGS").unwrap_or_default();
    for dir in dirs {
        if !flags.is_empty() {
            flags.push(' ');
        }
        flags.push_str(&format!("-L {}", dir.display()));
    }
    Some(flags)
}

#[derive(Debug, Deserialize)]
struct CargoMessage {
    reason: String,
    #[serde(default)]
    message: Option<RustcDiagnostic>,
    #[serde(default)]
    target: Option<CargoTarget>,
    #[serde(default)]
    filenames: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct CargoTarget {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RustcDiagnostic {
    message: String,
    level: String,
    #[serde(default)]
    code: Option<RustcCode>,
    #[serde(default)]
    spans: Vec<RustcSpan>,
    #[serde(default)]
    rendered: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RustcCode {
    code: String,
}

#[derive(Debug, Deserialize)]
struct RustcSpan {
    file_name: String,
    line_start: usize,
    column_start: usize,
    #[serde(default)]
    is_primary: bool,
}

/// Parse cargo's JSON message stream into diagnostics and the artifact path.
fn parse_build_output(crate_name: &str, stdout: &str) -> EmitOutcome {
    let mut outcome = EmitOutcome::default();

    for line in stdout.lines() {
        let Ok(message) = serde_json::from_str::<CargoMessage>(line) else {
            continue;
        };
        match message.reason.as_str() {
            "compiler-message" => {
                if let Some(diagnostic) = message.message {
                    outcome.diagnostics.push(convert_diagnostic(diagnostic));
                }
            }
            "compiler-artifact" => {
                let ours = message.target.as_ref().is_some_and(|t| t.name == crate_name);
                if ours {
                    outcome.artifact = message.filenames.into_iter().next();
                }
            }
            _ => {}
        }
    }

    outcome
}

fn convert_diagnostic(raw: RustcDiagnostic) -> Diagnostic {
    let mut diagnostic = Diagnostic::new(Severity::from_level(&raw.level), raw.message);
    if let Some(code) = raw.code {
        diagnostic = diagnostic.with_code(code.code);
    }
    if let Some(span) = raw.spans.iter().find(|s| s.is_primary).or(raw.spans.first()) {
        diagnostic = diagnostic.with_location(SourceLocation {
            file: span.file_name.clone(),
            line: span.line_start,
            column: span.column_start,
        });
    }
    if let Some(rendered) = raw.rendered {
        diagnostic = diagnostic.with_rendered(rendered);
    }
    diagnostic
}
