//! Field-mapping table
//!
//! Maps the logical parameter names of a glossaries macro (`abbreviation`, `description`, ...)
//! onto BibTeX field names, in both directions. Each [`MacroKind`] has a fixed default table;
//! callers layer overrides on top of it with [`FieldMapping::resolve`].
//!
//! | Kind     | Logical name   | Default field | Mandatory |
//! |----------|----------------|---------------|-----------|
//! | acronym  | `abbreviation` | `shorttitle`  | yes       |
//! | acronym  | `longname`     | `journal`     | yes       |
//! | acronym  | `description`  | `abstract`    |           |
//! | acronym  | `plural`       | `series`      |           |
//! | acronym  | `longplural`   | `volume`      |           |
//! | acronym  | `firstplural`  | `edition`     |           |
//! | acronym  | `sort`         | `publisher`   |           |
//! | glossary | `name`         | `journal`     |           |
//! | glossary | `description`  | `abstract`    |           |
//! | glossary | `plural`       | `series`      |           |
//! | glossary | `symbol`       | `volume`      |           |
//! | glossary | `text`         | `edition`     |           |
//! | glossary | `sort`         | `publisher`   |           |

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const ACRONYM_DEFAULTS: &[(&str, &str)] = &[
    ("abbreviation", "shorttitle"),
    ("longname", "journal"),
    ("description", "abstract"),
    ("plural", "series"),
    ("longplural", "volume"),
    ("firstplural", "edition"),
    ("sort", "publisher"),
];

const GLOSSARY_DEFAULTS: &[(&str, &str)] = &[
    ("name", "journal"),
    ("description", "abstract"),
    ("plural", "series"),
    ("symbol", "volume"),
    ("text", "edition"),
    ("sort", "publisher"),
];

/// The two supported glossaries macro shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroKind {
    /// `\newacronym[opts]{key}{abbreviation}{longname}`
    Acronym,
    /// `\newglossaryentry{key}{name={..},description={..}}`
    Glossary,
}

impl MacroKind {
    pub const ALL: [MacroKind; 2] = [MacroKind::Acronym, MacroKind::Glossary];

    /// The kind whose [`name`](Self::name) is `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The control sequence name, without the backslash.
    pub fn macro_name(self) -> &'static str {
        match self {
            MacroKind::Acronym => "newacronym",
            MacroKind::Glossary => "newglossaryentry",
        }
    }

    /// Short name used for registry lookup and configuration sections.
    pub fn name(self) -> &'static str {
        match self {
            MacroKind::Acronym => "acronym",
            MacroKind::Glossary => "glossary",
        }
    }

    pub fn defaults(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MacroKind::Acronym => ACRONYM_DEFAULTS,
            MacroKind::Glossary => GLOSSARY_DEFAULTS,
        }
    }

    /// Logical names that must resolve before any conversion runs.
    pub fn mandatory(self) -> &'static [&'static str] {
        match self {
            MacroKind::Acronym => &["abbreviation", "longname"],
            MacroKind::Glossary => &[],
        }
    }

    /// Logical names a record must carry to be written as markup.
    pub fn required_for_output(self) -> &'static [&'static str] {
        match self {
            MacroKind::Acronym => &["abbreviation", "longname"],
            MacroKind::Glossary => &["name", "description"],
        }
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved, bidirectional logical-name/field-name table for one macro kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    kind: MacroKind,
    to_field: HashMap<String, String>,
    to_logical: HashMap<String, String>,
}

impl FieldMapping {
    /// The built-in table for `kind`, without overrides.
    pub fn defaults(kind: MacroKind) -> Self {
        let to_field: HashMap<String, String> = kind
            .defaults()
            .iter()
            .map(|(logical, field)| (logical.to_string(), field.to_string()))
            .collect();
        let to_logical = to_field
            .iter()
            .map(|(logical, field)| (field.clone(), logical.clone()))
            .collect();
        Self {
            kind,
            to_field,
            to_logical,
        }
    }

    /// Merge `overrides` over the defaults of `kind`.
    ///
    /// Overrides win on key collision; unknown logical names are accepted as-is. An override
    /// with an empty field name removes that logical name. Field names are lowercased, matching
    /// how the BibTeX reader normalises them.
    ///
    /// Fails with [`FormatError::ConfigError`] when a mandatory logical name is left unmapped,
    /// when a logical name is empty, or when two logical names share a field.
    pub fn resolve<I, K, V>(kind: MacroKind, overrides: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged: BTreeMap<String, String> = kind
            .defaults()
            .iter()
            .map(|(logical, field)| (logical.to_string(), field.to_string()))
            .collect();

        for (logical, field) in overrides {
            let logical = logical.into().trim().to_string();
            let field = field.into().trim().to_lowercase();
            if logical.is_empty() {
                return Err(FormatError::ConfigError(format!(
                    "empty parameter name in {kind} mapping"
                )));
            }
            if field.is_empty() {
                merged.remove(&logical);
            } else {
                merged.insert(logical, field);
            }
        }

        for name in kind.mandatory() {
            if !merged.contains_key(*name) {
                return Err(FormatError::ConfigError(format!(
                    "mandatory parameter '{name}' has no field mapping for {kind}"
                )));
            }
        }

        let mut to_logical: HashMap<String, String> = HashMap::with_capacity(merged.len());
        for (logical, field) in &merged {
            if let Some(previous) = to_logical.insert(field.clone(), logical.clone()) {
                return Err(FormatError::ConfigError(format!(
                    "field '{field}' is mapped by both '{previous}' and '{logical}'"
                )));
            }
        }

        Ok(Self {
            kind,
            to_field: merged.into_iter().collect(),
            to_logical,
        })
    }

    pub fn kind(&self) -> MacroKind {
        self.kind
    }

    pub fn field_for(&self, logical: &str) -> Option<&str> {
        self.to_field.get(logical).map(String::as_str)
    }

    pub fn logical_name_for(&self, field: &str) -> Option<&str> {
        self.to_logical.get(field).map(String::as_str)
    }

    /// Field for a logical name the caller cannot proceed without.
    pub fn require(&self, logical: &str) -> Result<&str, FormatError> {
        self.field_for(logical).ok_or_else(|| {
            FormatError::ConfigError(format!(
                "mandatory parameter '{logical}' has no field mapping for {}",
                self.kind
            ))
        })
    }

    /// `(logical, field)` pairs sorted by logical name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .to_field
            .iter()
            .map(|(logical, field)| (logical.as_str(), field.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    pub fn len(&self) -> usize {
        self.to_field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_field.is_empty()
    }
}
