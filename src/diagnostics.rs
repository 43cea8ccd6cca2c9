//! Compiler diagnostics for the rewritten tree set.
//!
//! Diagnostics are immutable once produced. The orchestrator only inspects
//! them to route success or failure; nothing in this layer repairs, filters,
//! or retries on their behalf.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl Severity {
    /// Classify a compiler level string. Unknown levels rank as notes.
    pub fn from_level(level: &str) -> Self {
        if level.starts_with("error") {
            Severity::Error
        } else {
            match level {
                "warning" => Severity::Warning,
                "help" => Severity::Help,
                _ => Severity::Note,
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        };
        write!(f, "{text}")
    }
}

/// Primary source position of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// One compiler-produced error, warning, or note.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub code: Option<String>,
    pub location: Option<SourceLocation>,
    /// Compiler-rendered text, kept verbatim when available.
    pub rendered: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            location: None,
            rendered: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered = Some(rendered.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The compiler-rendered text, or a single-line fallback.
    pub fn render(&self) -> String {
        if let Some(rendered) = &self.rendered {
            return rendered.clone();
        }
        match &self.location {
            Some(loc) => format!("{}: {} ({}:{}:{})", self.severity, self.message, loc.file, loc.line, loc.column),
            None => format!("{}: {}", self.severity, self.message),
        }
    }
}

/// Whether any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Concatenate the rendered text of every error diagnostic.
pub fn render_errors(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(Diagnostic::render)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
