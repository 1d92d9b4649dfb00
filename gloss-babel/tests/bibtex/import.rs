//! Import tests for the BibTeX format (BibTeX → records)

use crate::common::fixture;
use gloss_babel::diagnostics::{Collect, DiagnosticKind};
use gloss_babel::format::Format;
use gloss_babel::formats::BibtexFormat;
use gloss_babel::Database;

fn read(name: &str) -> Database {
    BibtexFormat
        .parse(&fixture(name))
        .expect("Should parse bibtex")
        .strict()
        .expect("Should have no diagnostics")
}

#[test]
fn test_glossary_fixture() {
    let db = read("glossary.bib");
    assert_eq!(db.len(), 2);

    let thekey = db.get("thekey").unwrap();
    assert_eq!(thekey.entry_type, "misc");
    assert_eq!(thekey.get("journal"), Some("name"));
    assert_eq!(thekey.get("publisher"), Some("sortid"));
    assert_eq!(thekey.get("title"), Some("Thekey"));
}

#[test]
fn test_encounter_order_is_kept() {
    let db = read("glossary.bib");
    let ids: Vec<_> = db.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["thekey", "otherkey"]);
}

#[test]
fn test_string_macros_and_comments() {
    let db = read("acronyms.bib");
    assert_eq!(db.len(), 4);
    let pnt = db.get("pnt").unwrap();
    assert_eq!(pnt.entry_type, "article");
    assert_eq!(pnt.get("journal"), Some("Prime Number Theorem"));
}

#[test]
fn test_duplicates_are_diagnosed_not_fatal() {
    let source = "@misc{a, journal = {first}}\n@misc{b, journal = {b}}\n@misc{a, journal = {second}}\n";
    let mut collected = Collect::default();
    let db = BibtexFormat
        .parse(source)
        .unwrap()
        .resolve(&mut collected)
        .unwrap();

    assert_eq!(db.len(), 2);
    assert_eq!(db.get("a").unwrap().get("journal"), Some("first"));
    assert_eq!(collected.0.len(), 1);
    assert_eq!(collected.0[0].kind, DiagnosticKind::DuplicateIdentifier);
    assert_eq!(collected.0[0].key.as_deref(), Some("a"));
    assert_eq!(collected.0[0].row, None);
}

#[test]
fn test_keys_are_case_sensitive() {
    let db = BibtexFormat
        .parse("@misc{Key, journal = {1}}\n@misc{key, journal = {2}}")
        .unwrap()
        .strict()
        .unwrap();
    assert_eq!(db.len(), 2);
}
