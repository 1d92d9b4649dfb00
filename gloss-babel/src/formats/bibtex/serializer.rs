//! BibTeX writer
//!
//! Entries are sorted by entry type, then key; fields by name. Writing goes through the
//! `serde_bibtex` serializer with a validating [`LayoutFormatter`], which produces:
//!
//! ```text
//! @misc{key,
//!   abstract = {value},
//!   journal = {value}
//! }
//!
//! ```
//!
//! A key or value that is not valid BibTeX (an unbalanced brace, a key with whitespace) is a
//! serialization error rather than a corrupt file.

use crate::database::{Database, Record};
use crate::error::FormatError;
use serde::Serialize;
use serde_bibtex::ser::{Formatter, Serializer, ValidatingFormatter};
use std::collections::BTreeMap;
use std::io;

/// The shape `serde_bibtex` serializes as a regular entry.
#[derive(Serialize)]
struct RawEntry<'a> {
    entry_type: &'a str,
    entry_key: &'a str,
    fields: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a Record> for RawEntry<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            entry_type: &record.entry_type,
            entry_key: &record.id,
            fields: &record.fields,
        }
    }
}

/// Comma before each field instead of after it, so the last field has none, and a blank
/// line after every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutFormatter;

impl Formatter for LayoutFormatter {
    #[inline]
    fn write_entry_separator<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_entry_key_end<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_field_start<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b",\n  ")
    }

    #[inline]
    fn write_field_end<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_body_end<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\n}\n\n")
    }
}

/// Write the whole database in (entry type, key) order.
pub fn serialize_bibtex(db: &Database) -> Result<String, FormatError> {
    let mut sorted: Vec<&Record> = db.records().iter().collect();
    sorted.sort_by(|a, b| {
        a.entry_type
            .cmp(&b.entry_type)
            .then_with(|| a.id.cmp(&b.id))
    });
    let entries: Vec<RawEntry> = sorted.into_iter().map(RawEntry::from).collect();

    let mut buffer = Vec::new();
    let mut ser =
        Serializer::new_with_formatter(&mut buffer, ValidatingFormatter::new(LayoutFormatter));
    entries
        .serialize(&mut ser)
        .map_err(|e| FormatError::SerializationError(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| FormatError::SerializationError(e.to_string()))
}
