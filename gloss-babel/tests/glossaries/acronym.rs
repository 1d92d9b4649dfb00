//! Tests for the acronym format (`\newacronym`)

use crate::common::fixture;
use gloss_babel::diagnostics::{Collect, DiagnosticKind};
use gloss_babel::format::Format;
use gloss_babel::formats::{BibtexFormat, GlossariesFormat, MarkupOptions};
use gloss_babel::{Database, FieldMapping, MacroKind};
use insta::assert_snapshot;

fn acronyms() -> GlossariesFormat {
    GlossariesFormat::new(MacroKind::Acronym)
}

#[test]
fn test_import_fixture() {
    let mut collected = Collect::default();
    let db = acronyms()
        .parse(&fixture("acronyms.tex"))
        .unwrap()
        .resolve(&mut collected)
        .unwrap();

    let ids: Vec<_> = db.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["gcd", "bit", "lcm"]);

    let bit = db.get("bit").unwrap();
    assert_eq!(bit.get("shorttitle"), Some("b"));
    assert_eq!(bit.get("journal"), Some("binary digit"));
    assert_eq!(bit.get("abstract"), Some("a unit of information"));
    assert_eq!(bit.get("series"), Some("bits"));

    assert_eq!(db.get("gcd").unwrap().get("journal"), Some("Greatest Common Divisor"));

    assert_eq!(collected.0.len(), 1);
    let duplicate = &collected.0[0];
    assert_eq!(duplicate.kind, DiagnosticKind::DuplicateIdentifier);
    assert_eq!(duplicate.to_string(), "(row 8) Duplicate keys found: gcd (rows: 8)");
}

#[test]
fn test_import_is_strict_by_default() {
    let result = acronyms().parse(&fixture("acronyms.tex")).unwrap().strict();
    assert!(result.is_err());
}

#[test]
fn test_export_fixture() {
    let db = BibtexFormat
        .parse(&fixture("acronyms.bib"))
        .unwrap()
        .strict()
        .unwrap();
    let mut collected = Collect::default();
    let text = acronyms()
        .serialize(&db)
        .unwrap()
        .resolve(&mut collected)
        .unwrap();

    assert_snapshot!(text.trim_end(), @r###"
    % Created by bib2glossary
    \newacronym[description={a unit of information},plural={bits}]{bit}{b}{binary digit}
    \newacronym{gcd}{GCD}{Greatest Common Divisor}
    \newacronym{pnt}{PNT}{Prime Number Theorem}
    "###);

    assert_eq!(collected.0.len(), 1);
    assert_eq!(collected.0[0].kind, DiagnosticKind::MissingField);
    assert_eq!(collected.0[0].key.as_deref(), Some("draft"));
}

#[test]
fn test_export_with_entry_type_filter() {
    let db = BibtexFormat
        .parse(&fixture("acronyms.bib"))
        .unwrap()
        .strict()
        .unwrap();
    let options = MarkupOptions {
        filter: Some("article".to_string()),
        ..MarkupOptions::default()
    };
    let text = acronyms()
        .with_options(options)
        .serialize(&db)
        .unwrap()
        .strict()
        .unwrap();
    assert_eq!(
        text,
        "% Created by bib2glossary\n\\newacronym{pnt}{PNT}{Prime Number Theorem}\n"
    );
}

#[test]
fn test_custom_mapping() {
    let mapping = FieldMapping::resolve(
        MacroKind::Acronym,
        [("longname", "title"), ("abbreviation", "key")],
    )
    .unwrap();
    let format = GlossariesFormat::with_mapping(mapping);
    let db = format
        .parse("\\newacronym{html}{HTML}{HyperText Markup Language}")
        .unwrap()
        .strict()
        .unwrap();
    let html = db.get("html").unwrap();
    assert_eq!(html.get("title"), Some("HyperText Markup Language"));
    assert_eq!(html.get("key"), Some("HTML"));
    assert_eq!(html.get("journal"), None);
}

#[test]
fn test_malformed_definitions_are_skipped() {
    let source = r"
\newacronym{ok}{OK}{Okay}
\newacronym{short}{S}
\newacronym{a}{b}{c}{d}
\newacronym[plural={x}]{five}{F}{Five}{extra}
";
    let mut collected = Collect::default();
    let db = acronyms()
        .parse(source)
        .unwrap()
        .resolve(&mut collected)
        .unwrap();
    assert_eq!(db.len(), 1);
    let rows: Vec<_> = collected.0.iter().map(|d| d.row).collect();
    assert_eq!(rows, vec![Some(3), Some(4), Some(5)]);
    assert!(collected
        .0
        .iter()
        .all(|d| d.kind == DiagnosticKind::Structure));
}

#[test]
fn test_empty_document() {
    let db = acronyms()
        .parse("\\documentclass{article}\n\\begin{document}\n\\end{document}\n")
        .unwrap()
        .strict()
        .unwrap();
    assert_eq!(db, Database::new());
}
