//! Export tests for the BibTeX format (records → BibTeX)

use crate::common::fixture;
use gloss_babel::format::Format;
use gloss_babel::formats::BibtexFormat;
use gloss_babel::{Database, Record};
use insta::assert_snapshot;

fn write(db: &Database) -> String {
    BibtexFormat
        .serialize(db)
        .expect("Should serialize")
        .strict()
        .unwrap()
}

#[test]
fn test_fixture_is_rewritten_sorted() {
    let db = BibtexFormat
        .parse(&fixture("glossary.bib"))
        .unwrap()
        .strict()
        .unwrap();
    assert_snapshot!(write(&db).trim_end(), @r###"
    @misc{otherkey,
      abstract = {the description of other},
      journal = {other name},
      shorttitle = {OTHER}
    }

    @misc{thekey,
      abstract = {the description},
      journal = {name},
      publisher = {sortid},
      title = {Thekey}
    }
    "###);
}

#[test]
fn test_output_reads_back_identically() {
    let db = BibtexFormat
        .parse(&fixture("acronyms.bib"))
        .unwrap()
        .strict()
        .unwrap();
    let text = write(&db);
    let again = BibtexFormat.parse(&text).unwrap().strict().unwrap();

    let mut before = db.into_records();
    let mut after = again.into_records();
    before.sort_by(|a, b| a.id.cmp(&b.id));
    after.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(before, after);
}

#[test]
fn test_nested_braces_survive() {
    let db = Database::from_records(vec![
        Record::new("x", "misc").with_field("title", "The {LaTeX} {\\em Companion}")
    ]);
    let text = write(&db);
    assert_eq!(
        text,
        "@misc{x,\n  title = {The {LaTeX} {\\em Companion}}\n}\n\n"
    );
    let back = BibtexFormat.parse(&text).unwrap().strict().unwrap();
    assert_eq!(back, db);
}
