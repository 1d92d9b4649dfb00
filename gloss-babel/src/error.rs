//! Error types for format operations

use crate::diagnostics::Diagnostic;
use thiserror::Error;

/// Errors that abort a conversion
///
/// Recoverable problems (a malformed invocation, an unknown parameter, a duplicate key) are not
/// errors: they are reported as [`Diagnostic`]s next to the output. A diagnostic only becomes a
/// [`FormatError::Diagnostic`] when a handler such as [`crate::diagnostics::Strict`] escalates it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Invalid field mapping or configuration input
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A diagnostic escalated by a strict handler
    #[error("{0}")]
    Diagnostic(Diagnostic),
}
