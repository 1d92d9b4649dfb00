//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name.

use crate::database::Database;
use crate::diagnostics::{Converted, DiagnosticHandler};
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{BibtexFormat, GlossariesFormat, JsonFormat};
use crate::mapping::MacroKind;
use std::collections::HashMap;

/// Registry of record formats
///
/// Provides a centralized registry for all available formats.
/// Formats can be registered and retrieved by name.
///
/// # Examples
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(MyFormat);
///
/// let format = registry.get("my-format")?;
/// let db = format.parse("source text")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of every format claiming the extension of `filename` (sorted)
    pub fn formats_for_filename(&self, filename: &str) -> Vec<String> {
        let Some(extension) = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
        else {
            return Vec::new();
        };
        let extension = extension.to_ascii_lowercase();

        let mut names: Vec<String> = self
            .formats
            .values()
            .filter(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Returns the format name if exactly one format claims the extension. `.tex` is shared by
    /// the acronym and glossary formats, so it is never detected.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("refs.bib"), Some("bibtex".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("defs.tex"), None);
    /// ```
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let mut names = self.formats_for_filename(filename);
        if names.len() == 1 {
            names.pop()
        } else {
            None
        }
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Converted<Database>, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a database using the specified format
    pub fn serialize(&self, db: &Database, format: &str) -> Result<Converted<String>, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(db)
    }

    /// Parse with `from`, serialize with `to`, feeding every diagnostic of both passes to
    /// `handler` as soon as the pass that raised it finishes.
    pub fn convert<H>(
        &self,
        source: &str,
        from: &str,
        to: &str,
        handler: &mut H,
    ) -> Result<String, FormatError>
    where
        H: DiagnosticHandler + ?Sized,
    {
        let db = self.parse(source, from)?.resolve(handler)?;
        if db.is_empty() {
            tracing::debug!(from, "no records parsed");
        }
        self.serialize(&db, to)?.resolve(handler)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formats
        registry.register(BibtexFormat);
        registry.register(GlossariesFormat::new(MacroKind::Acronym));
        registry.register(GlossariesFormat::new(MacroKind::Glossary));
        registry.register(JsonFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Record;
    use crate::diagnostics::{Collect, Strict};

    // Test format
    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn file_extensions(&self) -> &[&str] {
            &["bib"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, _source: &str) -> Result<Converted<Database>, FormatError> {
            Ok(Converted::new(Database::from_records(vec![Record::new(
                "test", "misc",
            )])))
        }
        fn serialize(&self, _db: &Database) -> Result<Converted<String>, FormatError> {
            Ok(Converted::new("test output".to_string()))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.get("test").is_ok());
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let format = registry.get("test");
        assert!(format.is_ok());
        assert_eq!(format.unwrap().name(), "test");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        let result = registry.get("nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_parse_not_found() {
        let registry = FormatRegistry::new();

        let result = registry.parse("input", "nonexistent");
        match result.unwrap_err() {
            FormatError::FormatNotFound(name) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let output = registry.serialize(&Database::new(), "test").unwrap();
        assert_eq!(output.value, "test output");
    }

    #[test]
    fn test_registry_replace_format() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(GlossariesFormat::new(MacroKind::Acronym).with_options(
            crate::formats::MarkupOptions {
                header: None,
                ..Default::default()
            },
        ));
        assert_eq!(registry.list_formats().len(), 4);
        let output = registry
            .convert("@misc{a, shorttitle={A}, journal={Aa}}", "bibtex", "acronym", &mut Strict)
            .unwrap();
        assert_eq!(output, "\\newacronym{a}{A}{Aa}\n");
    }

    #[test]
    fn test_registry_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(
            registry.list_formats(),
            vec!["acronym", "bibtex", "glossary", "json"]
        );
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(
            registry.detect_format_from_filename("refs.bib"),
            Some("bibtex".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("REFS.BIB"),
            Some("bibtex".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("records.json"),
            Some("json".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("defs.tex"), None);
        assert_eq!(registry.detect_format_from_filename("noext"), None);
        assert_eq!(
            registry.formats_for_filename("defs.tex"),
            vec!["acronym", "glossary"]
        );
    }

    #[test]
    fn test_detect_ambiguous_with_custom_format() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(TestFormat);
        assert_eq!(registry.detect_format_from_filename("refs.bib"), None);
    }

    #[test]
    fn test_convert_collects_diagnostics() {
        let registry = FormatRegistry::with_defaults();
        let mut collected = Collect::default();
        let output = registry
            .convert(
                "\\newacronym{a}{A}{Aa}\n\\newacronym{a}{A}{again}\n",
                "acronym",
                "bibtex",
                &mut collected,
            )
            .unwrap();
        assert_eq!(output, "@misc{a,\n  journal = {Aa},\n  shorttitle = {A}\n}\n\n");
        assert_eq!(collected.0.len(), 1);
    }

    #[test]
    fn test_convert_strict_fails_on_diagnostic() {
        let registry = FormatRegistry::with_defaults();
        let result = registry.convert(
            "@misc{a, shorttitle={A}}",
            "bibtex",
            "acronym",
            &mut Strict,
        );
        assert!(matches!(result, Err(FormatError::Diagnostic(_))));
    }
}
