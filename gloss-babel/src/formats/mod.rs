//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the record [`Database`](crate::database::Database) and text representations.

pub mod bibtex;
pub mod glossaries;
pub mod json;

pub use bibtex::BibtexFormat;
pub use glossaries::{GlossariesFormat, MarkupOptions, DEFAULT_HEADER};
pub use json::JsonFormat;
