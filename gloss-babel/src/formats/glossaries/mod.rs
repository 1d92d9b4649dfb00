//! LaTeX glossaries format implementation
//!
//! One [`GlossariesFormat`] per macro kind: `acronym` reads and writes `\newacronym`,
//! `glossary` reads and writes `\newglossaryentry`. Both share the tokenizer (crate::markup)
//! and the conversion core (crate::common); this module only wires them to the [`Format`]
//! trait and owns the document-level layout.
//!
//! # Element Mapping Table
//!
//! | Markup                                | Record                                      |
//! |---------------------------------------|---------------------------------------------|
//! | `\newacronym{key}{AA}{Long}`          | `{id: key, shorttitle: AA, journal: Long}`  |
//! | `\newacronym[description={d}]...`     | `abstract: d` (any mapped logical name)     |
//! | `\newglossaryentry{key}{name={n},..}` | `{id: key, journal: n, ..}`                 |
//! | entry type                            | [`MarkupOptions::entry_type`] on read       |
//!
//! # Lossy Conversions
//!
//! - parameters with no field mapping are dropped on read (with a diagnostic)
//! - fields with no logical name are dropped on write
//! - the BibTeX entry type is not represented in markup
//! - comments and every other macro in the document are ignored
//!
//! # Layout
//!
//! ```text
//! % Created by bib2glossary
//! \newacronym[description={d}]{k}{K}{Key}
//! \newglossaryentry{g}{
//!     description={..},
//!     name={..}
//! }
//! ```

use crate::common::{markup_to_records, records_to_markup};
use crate::database::Database;
use crate::diagnostics::Converted;
use crate::error::FormatError;
use crate::format::Format;
use crate::mapping::{FieldMapping, MacroKind};
use crate::markup::find_invocations;

/// First line of every generated markup file.
pub const DEFAULT_HEADER: &str = "% Created by bib2glossary";

/// Options that are not part of the field mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Entry type given to every record read from markup.
    pub entry_type: String,
    /// Only records of this entry type are written as markup.
    pub filter: Option<String>,
    /// Comment line written before the definitions.
    pub header: Option<String>,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            entry_type: "misc".to_string(),
            filter: None,
            header: Some(DEFAULT_HEADER.to_string()),
        }
    }
}

/// Format implementation for `\newacronym` or `\newglossaryentry` definitions
#[derive(Debug, Clone)]
pub struct GlossariesFormat {
    mapping: FieldMapping,
    options: MarkupOptions,
}

impl GlossariesFormat {
    /// Default mapping and options for `kind`.
    pub fn new(kind: MacroKind) -> Self {
        Self::with_mapping(FieldMapping::defaults(kind))
    }

    pub fn with_mapping(mapping: FieldMapping) -> Self {
        Self {
            mapping,
            options: MarkupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MarkupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> MacroKind {
        self.mapping.kind()
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    /// The macro definitions for `db`, one string per record written.
    pub fn definitions(&self, db: &Database) -> Result<Converted<Vec<String>>, FormatError> {
        records_to_markup(db.records(), self.options.filter.as_deref(), &self.mapping)
    }

    /// The document: the header line if any, then one definition per line.
    pub fn render(&self, definitions: &[String]) -> String {
        let mut lines: Vec<&str> = Vec::with_capacity(definitions.len() + 1);
        if let Some(header) = &self.options.header {
            lines.push(header);
        }
        lines.extend(definitions.iter().map(String::as_str));
        if lines.is_empty() {
            String::new()
        } else {
            lines.join("\n") + "\n"
        }
    }
}

impl Format for GlossariesFormat {
    fn name(&self) -> &str {
        self.kind().name()
    }

    fn description(&self) -> &str {
        match self.kind() {
            MacroKind::Acronym => "LaTeX glossaries \\newacronym definitions",
            MacroKind::Glossary => "LaTeX glossaries \\newglossaryentry definitions",
        }
    }

    fn file_extensions(&self) -> &[&str] {
        &["tex"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Converted<Database>, FormatError> {
        let invocations = find_invocations(source, &[self.kind().macro_name()])?;
        Ok(
            markup_to_records(&invocations, &self.options.entry_type, &self.mapping)
                .and_then(|parsed| parsed.into_database()),
        )
    }

    fn serialize(&self, db: &Database) -> Result<Converted<String>, FormatError> {
        Ok(self
            .definitions(db)?
            .map(|definitions| self.render(&definitions)))
    }
}
