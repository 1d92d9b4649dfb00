//! Format-agnostic conversion core shared by the glossaries formats.
//!
//!     params.rs holds the argument-list parser (arity checks and the parameter-block state
//!     machine), convert.rs the two passes between records and markup built on top of it.

pub mod convert;
pub mod params;

pub use convert::{duplicates_message, markup_to_records, records_to_markup, ParsedRecords};
pub use params::{parse_parameter_block, split_arguments, BlockError, ParameterBlock, SplitInvocation};
