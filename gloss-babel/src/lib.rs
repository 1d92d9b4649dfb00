//! Conversion between BibTeX databases and LaTeX glossaries definitions
//!
//!     This crate keeps one canonical source of glossary terms and generates the other
//!     representation on demand: BibTeX records on one side, `\newacronym` and
//!     `\newglossaryentry` definitions on the other.
//!
//!     This is a pure lib, that is, it powers the bib2glossary cli but is shell agnostic: no code
//!     here supposes a shell environment, be it std print, env vars or the file system.
//!
//! Architecture
//!
//!     Every conversion pivots on the record model (./database.rs). Formats parse text into a
//!     Database and serialize a Database back into text, so any readable format converts to any
//!     writable one.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # FormatError, the fatal failures
//!     ├── diagnostics.rs          # Diagnostic, Converted<T> and the handlers
//!     ├── database.rs             # Record and Database
//!     ├── mapping.rs              # logical parameter name <-> BibTeX field table
//!     ├── markup                  # LaTeX macro tokenizer
//!     ├── common
//!     │   ├── params.rs           # argument-list parser
//!     │   └── convert.rs          # records <-> markup passes
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── bibtex              # parser.rs + serializer.rs
//!     │   ├── glossaries          # acronym and glossary formats
//!     │   └── json
//!     └── transforms.rs           # one-call text to text helpers
//!
//! Core Algorithms
//!
//!     The hard part is the markup side. Definitions are loosely structured: an optional
//!     bracketed parameter block, `key={value}` pairs whose separators spill over several text
//!     runs, trailing commas and newlines. The argument-list parser (./common/params.rs) walks
//!     the flat token sequence with a two-state machine and reports, rather than guesses, when
//!     the input does not fit.
//!
//! Diagnostics
//!
//!     Conversions are best effort. A malformed definition, an unknown parameter, a duplicate key
//!     or a record missing a mandatory field is skipped and reported as a Diagnostic next to the
//!     output. Callers pick what a diagnostic means with a DiagnosticHandler; the default (Strict)
//!     fails on the first one.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── bibtex
//!     ├── glossaries
//!     ├── roundtrip.rs
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.

pub mod common;
pub mod database;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod formats;
pub mod mapping;
pub mod markup;
pub mod registry;
pub mod transforms;

pub use database::{Database, Record};
pub use diagnostics::{
    Collect, Converted, Diagnostic, DiagnosticHandler, DiagnosticKind, LogWarnings, Strict,
};
pub use error::FormatError;
pub use format::Format;
pub use mapping::{FieldMapping, MacroKind};
pub use registry::FormatRegistry;
