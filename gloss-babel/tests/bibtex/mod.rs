//! BibTeX format tests
//!
//! Reading real-world shaped databases and writing them back.

mod export;
mod import;
