//! LaTeX markup tokenizer
//!
//!     Turns raw LaTeX text into the macro invocations the glossaries formats care about. Only
//!     the named macros are located; everything else in the document is skipped over.
//!
//!     The nodes (./nodes.rs) are plain sum types so that the argument-list parser can match on
//!     them exhaustively. The scanner (./tokenizer.rs) is byte oriented and uses memchr to jump
//!     between backslashes and comment markers.

pub mod nodes;
pub mod tokenizer;

pub use nodes::{Argument, Group, MacroInvocation, Token};
pub use tokenizer::{check_group_content, find_invocations, tokenize, MAX_NESTING};
