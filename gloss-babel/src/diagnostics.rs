//! Diagnostics channel shared by both conversion pipelines
//!
//! Conversions are best-effort: a malformed invocation, an unknown parameter or a repeated
//! key does not abort the pass. Instead each problem becomes a [`Diagnostic`] that travels
//! next to the output inside a [`Converted`] value.
//!
//! At the boundary a [`DiagnosticHandler`] decides what the diagnostics mean. The default
//! ([`Strict`]) turns the first one into a hard failure, so that dropping data silently
//! always requires an explicit opt-in ([`LogWarnings`], [`Collect`] or a closure).

use crate::error::FormatError;
use serde::Serialize;
use std::fmt;

/// The category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Malformed argument arity or parameter-block grammar.
    Structure,
    /// An identifier seen earlier in the same pass.
    DuplicateIdentifier,
    /// A parameter name with no entry in the field mapping.
    UnrecognisedParameter,
    /// A parameter whose field already holds a value.
    DuplicateParameter,
    /// A record lacking a field required to emit markup.
    MissingField,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Structure => "structure",
            DiagnosticKind::DuplicateIdentifier => "duplicate identifier",
            DiagnosticKind::UnrecognisedParameter => "unrecognised parameter",
            DiagnosticKind::DuplicateParameter => "duplicate parameter",
            DiagnosticKind::MissingField => "missing field",
        };
        f.write_str(label)
    }
}

/// A skipped or degraded unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Identifier of the offending entry, when one could be read.
    pub key: Option<String>,
    /// 1-based source row, when known.
    pub row: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_row(mut self, row: Option<usize>) -> Self {
        self.row = row;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "(row {row}) ")?;
        }
        f.write_str(&self.message)
    }
}

/// A conversion output together with the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Converted<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// True when the pass raised no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn map<U, F>(self, f: F) -> Converted<U>
    where
        F: FnOnce(T) -> U,
    {
        Converted {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Chain a second pass, keeping the diagnostics of both in order.
    pub fn and_then<U, F>(self, f: F) -> Converted<U>
    where
        F: FnOnce(T) -> Converted<U>,
    {
        let next = f(self.value);
        let mut diagnostics = self.diagnostics;
        diagnostics.extend(next.diagnostics);
        Converted {
            value: next.value,
            diagnostics,
        }
    }

    /// Feed every diagnostic to `handler`, returning the value unless the handler fails.
    pub fn resolve<H>(self, handler: &mut H) -> Result<T, FormatError>
    where
        H: DiagnosticHandler + ?Sized,
    {
        for diagnostic in self.diagnostics {
            handler.handle(diagnostic)?;
        }
        Ok(self.value)
    }

    /// Resolve with the default [`Strict`] handler.
    pub fn strict(self) -> Result<T, FormatError> {
        self.resolve(&mut Strict)
    }
}

/// Consumer of diagnostics at the edge of a conversion.
pub trait DiagnosticHandler {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<(), FormatError>;
}

impl<F> DiagnosticHandler for F
where
    F: FnMut(Diagnostic) -> Result<(), FormatError>,
{
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<(), FormatError> {
        self(diagnostic)
    }
}

/// Escalates the first diagnostic into [`FormatError::Diagnostic`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl DiagnosticHandler for Strict {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<(), FormatError> {
        Err(FormatError::Diagnostic(diagnostic))
    }
}

/// Logs each diagnostic as a warning and carries on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWarnings;

impl DiagnosticHandler for LogWarnings {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<(), FormatError> {
        tracing::warn!(
            kind = %diagnostic.kind,
            key = diagnostic.key.as_deref().unwrap_or(""),
            "{diagnostic}"
        );
        Ok(())
    }
}

/// Stores every diagnostic for later inspection.
#[derive(Debug, Default, Clone)]
pub struct Collect(pub Vec<Diagnostic>);

impl DiagnosticHandler for Collect {
    fn handle(&mut self, diagnostic: Diagnostic) -> Result<(), FormatError> {
        self.0.push(diagnostic);
        Ok(())
    }
}
