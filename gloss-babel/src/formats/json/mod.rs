//! JSON format implementation
//!
//! The [`Database`] as a JSON array of `{"id", "entry_type", "fields"}` objects. Useful for
//! inspecting what a conversion read and for piping records into other tools.
//!
//! Read like BibTeX: entry types are lowercased and a repeated `id` keeps its first record
//! with a duplicate-identifier diagnostic.

use crate::common::ParsedRecords;
use crate::database::{Database, Record};
use crate::diagnostics::Converted;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for JSON records
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Records as a JSON array"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Converted<Database>, FormatError> {
        let records: Vec<Record> = serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("invalid JSON records: {e}")))?;
        let parsed: ParsedRecords = records
            .into_iter()
            .map(|mut record| {
                record.entry_type = record.entry_type.to_lowercase();
                record
            })
            .collect();
        Ok(parsed.into_database())
    }

    fn serialize(&self, db: &Database) -> Result<Converted<String>, FormatError> {
        let mut text = serde_json::to_string_pretty(db)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        text.push('\n');
        Ok(Converted::new(text))
    }
}
