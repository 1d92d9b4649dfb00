//! Tests for the glossary format (`\newglossaryentry`)

use crate::common::fixture;
use gloss_babel::diagnostics::{Collect, DiagnosticKind};
use gloss_babel::format::Format;
use gloss_babel::formats::{GlossariesFormat, MarkupOptions};
use gloss_babel::{FieldMapping, FormatRegistry, MacroKind, Strict};

fn registry_with(format: GlossariesFormat) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(format);
    registry
}

#[test]
fn test_tex_to_bib_with_entry_type() {
    let options = MarkupOptions {
        entry_type: "other".to_string(),
        ..MarkupOptions::default()
    };
    let registry =
        registry_with(GlossariesFormat::new(MacroKind::Glossary).with_options(options));
    let output = registry
        .convert(&fixture("glossary.tex"), "glossary", "bibtex", &mut Strict)
        .unwrap();
    assert_eq!(
        output,
        "@other{otherkey,
  abstract = {the description of other},
  journal = {other name}
}

@other{thekey,
  abstract = {the description},
  journal = {name},
  publisher = {sortid}
}

"
    );
}

#[test]
fn test_tex_to_bib_with_overrides() {
    let mapping = FieldMapping::resolve(MacroKind::Glossary, [("sort", "sortfield")]).unwrap();
    let registry = registry_with(GlossariesFormat::with_mapping(mapping));
    let output = registry
        .convert(&fixture("glossary.tex"), "glossary", "bibtex", &mut Strict)
        .unwrap();
    assert!(output.contains("  sortfield = {sortid}\n"), "{output}");
    assert!(!output.contains("publisher"), "{output}");
}

#[test]
fn test_bib_to_tex() {
    let options = MarkupOptions {
        filter: Some("misc".to_string()),
        ..MarkupOptions::default()
    };
    let registry =
        registry_with(GlossariesFormat::new(MacroKind::Glossary).with_options(options));
    let output = registry
        .convert(&fixture("glossary.bib"), "bibtex", "glossary", &mut Strict)
        .unwrap();
    assert_eq!(
        output,
        "% Created by bib2glossary
\\newglossaryentry{otherkey}{
    description={the description of other},
    name={other name}
}
\\newglossaryentry{thekey}{
    description={the description},
    name={name},
    sort={sortid}
}
"
    );
}

#[test]
fn test_bib_to_tex_missing_type() {
    let options = MarkupOptions {
        filter: Some("other".to_string()),
        ..MarkupOptions::default()
    };
    let registry =
        registry_with(GlossariesFormat::new(MacroKind::Glossary).with_options(options));
    let output = registry
        .convert(&fixture("glossary.bib"), "bibtex", "glossary", &mut Strict)
        .unwrap();
    assert_eq!(output, "% Created by bib2glossary\n");
}

#[test]
fn test_parameter_problems_are_reported_per_entry() {
    let source = r"
\newglossaryentry{g}{
    name={n},
    colour={red},
    description={d},
    name={again}
}
";
    let mut collected = Collect::default();
    let db = GlossariesFormat::new(MacroKind::Glossary)
        .parse(source)
        .unwrap()
        .resolve(&mut collected)
        .unwrap();

    let g = db.get("g").unwrap();
    assert_eq!(g.get("journal"), Some("n"));
    assert_eq!(g.get("abstract"), Some("d"));

    let kinds: Vec<_> = collected.0.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::Structure, DiagnosticKind::UnrecognisedParameter]
    );
    assert_eq!(
        collected.0[1].message,
        "parameter 'colour' in key 'g' not recognised"
    );
}

#[test]
fn test_block_stops_at_orphan_value() {
    let source = "\\newglossaryentry{g}{name={n}, {orphan}, description={d}}";
    let mut collected = Collect::default();
    let db = GlossariesFormat::new(MacroKind::Glossary)
        .parse(source)
        .unwrap()
        .resolve(&mut collected)
        .unwrap();
    let g = db.get("g").unwrap();
    assert_eq!(g.get("journal"), Some("n"));
    assert_eq!(g.get("abstract"), None);
    assert_eq!(collected.0.len(), 1);
}
