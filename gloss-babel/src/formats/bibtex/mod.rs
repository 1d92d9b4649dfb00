//! BibTeX format implementation
//!
//! The reference-database side of every conversion.
//!
//! # Reading
//!
//! Parsing is delegated to `serde_bibtex` (./parser.rs): anything outside an `@entry` is
//! ignored, `@comment` and `@preamble` are skipped, `@string` macros are expanded (`jan` to
//! `dec` are predefined as month numbers). Entry types and field names come out lowercased.
//! A key defined twice keeps its first entry and raises a duplicate-identifier diagnostic.
//!
//! # Writing
//!
//! The writer (./serializer.rs) is deterministic: entries sorted by (entry type, key), fields
//! sorted by name, values always brace-delimited, two-space indentation, a blank line after
//! each entry.
//!
//! # Lossy Conversions
//!
//! - `@string` macros are expanded on read and never written back
//! - quoted values are written brace-delimited
//! - comments, preambles and junk between entries are dropped

pub mod parser;
pub mod serializer;

use crate::database::Database;
use crate::diagnostics::Converted;
use crate::error::FormatError;
use crate::format::Format;

pub use parser::parse_bibtex;
pub use serializer::{serialize_bibtex, LayoutFormatter};

/// Format implementation for BibTeX
#[derive(Debug, Default, Clone, Copy)]
pub struct BibtexFormat;

impl Format for BibtexFormat {
    fn name(&self) -> &str {
        "bibtex"
    }

    fn description(&self) -> &str {
        "BibTeX reference database"
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

    fn parse(&self, source: &str) -> Result<Converted<Database>, FormatError> {
        parse_bibtex(source)
    }

    fn serialize(&self, db: &Database) -> Result<Converted<String>, FormatError> {
        serialize_bibtex(db).map(Converted::new)
    }
}
