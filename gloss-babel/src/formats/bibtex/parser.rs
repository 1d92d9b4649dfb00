//! BibTeX reader
//!
//! The grammar is handled by `serde_bibtex`: text between entries is ignored, `@comment` and
//! `@preamble` are skipped and `@string` macros are captured and expanded, with the month
//! macros (`jan = 1` to `dec = 12`) predefined. Only regular entries reach this module,
//! which adapts them to [`Record`]s: entry types and field names are lowercased, keys keep
//! their case, and a key seen twice keeps its first entry.

use crate::common::ParsedRecords;
use crate::database::{Database, Record};
use crate::diagnostics::Converted;
use crate::error::FormatError;
use serde::Deserialize;
use serde_bibtex::de::Deserializer;
use serde_bibtex::MacroDictionary;
use std::collections::BTreeMap;

/// A regular entry as `serde_bibtex` hands it over.
#[derive(Debug, Deserialize)]
struct RawEntry {
    entry_type: String,
    entry_key: String,
    fields: BTreeMap<String, String>,
}

impl From<RawEntry> for Record {
    fn from(raw: RawEntry) -> Self {
        let mut fields = BTreeMap::new();
        for (name, value) in raw.fields {
            fields.entry(name.to_lowercase()).or_insert(value);
        }
        Record {
            id: raw.entry_key,
            entry_type: raw.entry_type.to_lowercase(),
            fields,
        }
    }
}

/// Read every record in `source`. A repeated key keeps its first entry.
pub fn parse_bibtex(source: &str) -> Result<Converted<Database>, FormatError> {
    let mut macros: MacroDictionary<&str, &[u8]> = MacroDictionary::default();
    macros.set_month_macros();

    // serde_bibtex reports no positions, so duplicates carry no row
    let parsed: ParsedRecords = Deserializer::from_str_with_macros(source, macros)
        .into_iter_regular_entry::<RawEntry>()
        .map(|entry| {
            entry
                .map(Record::from)
                .map_err(|e| FormatError::ParseError(e.to_string()))
        })
        .collect::<Result<_, _>>()?;

    tracing::debug!(
        records = parsed.records.len(),
        duplicates = parsed.duplicates.len(),
        "read bibtex"
    );
    Ok(parsed.into_database())
}
