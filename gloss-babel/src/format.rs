//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing text into a [`Database`] and serializing
//! a [`Database`] back to text.

use crate::database::Database;
use crate::diagnostics::Converted;
use crate::error::FormatError;

/// Trait for record formats
///
/// Implementors provide conversion between a string representation and the shared
/// [`Database`] model. Formats can support parsing, serialization, or both.
///
/// Recoverable problems (a skipped entry, an unknown parameter) are returned as diagnostics
/// next to the value; only failures that leave no usable output are `Err`.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Converted<Database>, FormatError> {
///         // Parse source to a Database
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "bibtex", "acronym", "glossary")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["bib"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Database)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Database → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Database
    ///
    /// Default implementation returns NotSupported error.
    /// Formats that support parsing should override this method.
    fn parse(&self, _source: &str) -> Result<Converted<Database>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Database into source text
    ///
    /// Default implementation returns NotSupported error.
    /// Formats that support serialization should override this method.
    fn serialize(&self, _db: &Database) -> Result<Converted<String>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ParseOnly;

    impl Format for ParseOnly {
        fn name(&self) -> &str {
            "parse-only"
        }

        fn supports_parsing(&self) -> bool {
            true
        }

        fn parse(&self, _source: &str) -> Result<Converted<Database>, FormatError> {
            Ok(Converted::new(Database::new()))
        }
    }

    #[test]
    fn test_default_serialize_is_not_supported() {
        let format = ParseOnly;
        assert!(!format.supports_serialization());
        match format.serialize(&Database::new()) {
            Err(FormatError::NotSupported(msg)) => {
                assert_eq!(msg, "Format 'parse-only' does not support serialization")
            }
            other => panic!("Expected NotSupported, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let format = ParseOnly;
        assert_eq!(format.description(), "");
        assert!(format.file_extensions().is_empty());
        assert!(format.parse("").unwrap().value.is_empty());
    }
}
