//! Converter
//!
//! The two mirrored passes between records and glossaries markup. Both are pure functions of
//! their inputs; per-pass state (seen keys, duplicates, diagnostics) lives on the stack.

use super::params::split_arguments;
use crate::database::{Database, Record};
use crate::diagnostics::{Converted, Diagnostic, DiagnosticKind};
use crate::error::FormatError;
use crate::mapping::{FieldMapping, MacroKind};
use crate::markup::{check_group_content, MacroInvocation};
use std::collections::{BTreeMap, HashSet};

/// Records built from markup, plus the keys that were defined more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    /// One record per distinct key, in encounter order.
    pub records: Vec<Record>,
    /// Rows of every discarded repeat, keyed by identifier.
    pub duplicates: BTreeMap<String, Vec<Option<usize>>>,
}

impl ParsedRecords {
    /// Turn the duplicates map into diagnostics and keep the records.
    pub fn into_database(self) -> Converted<Database> {
        let diagnostics = self
            .duplicates
            .iter()
            .map(|(key, rows)| {
                Diagnostic::new(
                    DiagnosticKind::DuplicateIdentifier,
                    duplicates_message([(key, rows)]),
                )
                .with_key(key.clone())
                .with_row(rows.iter().flatten().next().copied())
            })
            .collect();
        Converted::with_diagnostics(Database::from_records(self.records), diagnostics)
    }
}

impl FromIterator<Record> for ParsedRecords {
    /// The first record of a key stands; repeats are recorded without a row.
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut parsed = ParsedRecords::default();
        let mut seen = HashSet::new();
        for record in iter {
            if seen.insert(record.id.clone()) {
                parsed.records.push(record);
            } else {
                parsed.duplicates.entry(record.id).or_default().push(None);
            }
        }
        parsed
    }
}

/// `Duplicate keys found: a (rows: 3, 9), b`
pub fn duplicates_message<'a, I>(duplicates: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a Vec<Option<usize>>)>,
{
    let parts: Vec<String> = duplicates
        .into_iter()
        .map(|(key, rows)| {
            let rows: Vec<String> = rows.iter().flatten().map(usize::to_string).collect();
            if rows.is_empty() {
                key.clone()
            } else {
                format!("{key} (rows: {})", rows.join(", "))
            }
        })
        .collect();
    format!("Duplicate keys found: {}", parts.join(", "))
}

/// Render records as glossaries macros, sorted by identifier.
///
/// `filter` keeps only records of that entry type. Records lacking a field the macro cannot
/// do without are skipped with a [`DiagnosticKind::MissingField`] diagnostic, records whose
/// key or mapped values would not read back from markup with a [`DiagnosticKind::Structure`]
/// one.
pub fn records_to_markup(
    records: &[Record],
    filter: Option<&str>,
    mapping: &FieldMapping,
) -> Result<Converted<Vec<String>>, FormatError> {
    let kind = mapping.kind();
    let required = kind
        .required_for_output()
        .iter()
        .map(|logical| mapping.require(logical))
        .collect::<Result<Vec<_>, _>>()?;

    // entry types are lowercased on read
    let filter = filter.map(str::to_lowercase);
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut output = Vec::with_capacity(sorted.len());
    let mut diagnostics = Vec::new();

    for record in sorted {
        if let Some(entry_type) = &filter {
            if record.entry_type != *entry_type {
                tracing::debug!(key = %record.id, entry_type = %record.entry_type, "filtered out");
                continue;
            }
        }

        if let Some(field) = required.iter().find(|field| record.get(field).is_none()) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MissingField,
                    format!("Skipping {}: No {} key found", record.id, field),
                )
                .with_key(record.id.clone()),
            );
            continue;
        }

        if let Some(problem) = unwritable(record, mapping) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::Structure,
                    format!("Skipping {}: {problem}", record.id),
                )
                .with_key(record.id.clone()),
            );
            continue;
        }

        let text = match kind {
            MacroKind::Acronym => acronym_markup(record, mapping),
            MacroKind::Glossary => glossary_markup(record, mapping),
        };
        tracing::debug!(key = %record.id, macro_name = kind.macro_name(), "emitted");
        output.push(text);
    }

    Ok(Converted::with_diagnostics(output, diagnostics))
}

/// The first written value that the tokenizer would not read back as it is.
fn unwritable(record: &Record, mapping: &FieldMapping) -> Option<String> {
    if let Err(problem) = check_group_content(&record.id) {
        return Some(format!("key {problem}"));
    }
    mapping.entries().into_iter().find_map(|(_, field)| {
        let value = record.get(field)?;
        check_group_content(value)
            .err()
            .map(|problem| format!("{field} {problem}"))
    })
}

/// Named parameters present on `record`, sorted by logical name.
fn present_options<'a>(
    record: &'a Record,
    mapping: &'a FieldMapping,
    positional: &[&str],
) -> Vec<String> {
    mapping
        .entries()
        .into_iter()
        .filter(|(logical, _)| !positional.contains(logical))
        .filter_map(|(logical, field)| {
            record
                .get(field)
                .map(|value| format!("{logical}={{{value}}}"))
        })
        .collect()
}

fn acronym_markup(record: &Record, mapping: &FieldMapping) -> String {
    let value = |logical: &str| {
        mapping
            .field_for(logical)
            .and_then(|field| record.get(field))
            .unwrap_or_default()
    };
    let options = present_options(record, mapping, &["abbreviation", "longname"]);
    let options = if options.is_empty() {
        String::new()
    } else {
        format!("[{}]", options.join(","))
    };
    format!(
        "\\newacronym{options}{{{}}}{{{}}}{{{}}}",
        record.id,
        value("abbreviation"),
        value("longname")
    )
}

fn glossary_markup(record: &Record, mapping: &FieldMapping) -> String {
    let options = present_options(record, mapping, &[]);
    format!(
        "\\newglossaryentry{{{}}}{{\n    {}\n}}",
        record.id,
        options.join(",\n    ")
    )
}

/// Build records from the invocations of the mapping's macro, in encounter order.
///
/// Malformed invocations and repeats of an already seen key contribute no record; the first
/// definition of a key always stands.
pub fn markup_to_records(
    invocations: &[MacroInvocation],
    entry_type: &str,
    mapping: &FieldMapping,
) -> Converted<ParsedRecords> {
    let kind = mapping.kind();
    let mut parsed = ParsedRecords::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut diagnostics = Vec::new();

    for invocation in invocations
        .iter()
        .filter(|inv| inv.name == kind.macro_name())
    {
        let split = match split_arguments(kind, invocation) {
            Ok(split) => split,
            Err(diagnostic) => {
                tracing::debug!(row = invocation.row, "rejected invocation");
                diagnostics.push(diagnostic);
                continue;
            }
        };

        if !seen.insert(split.id) {
            parsed
                .duplicates
                .entry(split.id.to_string())
                .or_default()
                .push(Some(invocation.row));
            continue;
        }

        let fields = split.assign_fields(mapping);
        diagnostics.extend(fields.diagnostics);
        parsed.records.push(Record {
            id: split.id.to_string(),
            entry_type: entry_type.to_string(),
            fields: fields.value,
        });
    }

    tracing::debug!(
        records = parsed.records.len(),
        duplicates = parsed.duplicates.len(),
        "parsed {} definitions",
        kind.macro_name()
    );
    Converted::with_diagnostics(parsed, diagnostics)
}
