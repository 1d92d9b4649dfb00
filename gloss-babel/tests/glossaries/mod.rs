//! LaTeX glossaries format tests
//!
//! Tests for `\newacronym` and `\newglossaryentry` in both directions.

mod acronym;
mod glossary;
