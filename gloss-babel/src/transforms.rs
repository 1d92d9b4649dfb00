//! One-call conversions
//!
//! Functional wrappers over the registry formats for callers that only want text in and text
//! out. Each takes the field-mapping overrides as plain pairs and resolves them first, so a
//! bad mapping fails before any input is read.

use crate::common::{markup_to_records, records_to_markup};
use crate::diagnostics::Converted;
use crate::error::FormatError;
use crate::formats::bibtex::{parse_bibtex, serialize_bibtex};
use crate::mapping::{FieldMapping, MacroKind};
use crate::markup::find_invocations;

/// BibTeX text to a list of macro definitions, sorted by key.
///
/// `filter` keeps only entries of that type.
///
/// # Example
///
/// ```
/// use gloss_babel::mapping::MacroKind;
/// use gloss_babel::transforms::bibtex_to_markup;
///
/// let bib = "@misc{aa, shorttitle = {AA}, journal = {An Acronym}}";
/// let defs = bibtex_to_markup(bib, MacroKind::Acronym, None, Vec::<(String, String)>::new())
///     .unwrap()
///     .strict()
///     .unwrap();
/// assert_eq!(defs, vec!["\\newacronym{aa}{AA}{An Acronym}"]);
/// ```
pub fn bibtex_to_markup<I, K, V>(
    source: &str,
    kind: MacroKind,
    filter: Option<&str>,
    overrides: I,
) -> Result<Converted<Vec<String>>, FormatError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mapping = FieldMapping::resolve(kind, overrides)?;
    let Converted {
        value: db,
        mut diagnostics,
    } = parse_bibtex(source)?;
    let definitions = records_to_markup(db.records(), filter, &mapping)?;
    diagnostics.extend(definitions.diagnostics);
    Ok(Converted::with_diagnostics(definitions.value, diagnostics))
}

/// Macro definitions in LaTeX text to BibTeX, every entry typed `entry_type`.
///
/// Duplicate keys are reported after the per-definition diagnostics.
pub fn markup_to_bibtex<I, K, V>(
    source: &str,
    kind: MacroKind,
    entry_type: &str,
    overrides: I,
) -> Result<Converted<String>, FormatError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mapping = FieldMapping::resolve(kind, overrides)?;
    let invocations = find_invocations(source, &[kind.macro_name()])?;
    let db = markup_to_records(&invocations, entry_type, &mapping)
        .and_then(|parsed| parsed.into_database());
    let text = serialize_bibtex(&db.value)?;
    Ok(db.map(|_| text))
}
