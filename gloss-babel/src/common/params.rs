//! Argument-list parser
//!
//! Validates the arity of a glossaries macro invocation, pulls out its positional values and
//! parses the named-parameter block (`name={..}, description={..}`) into an ordered list.
//!
//! The block grammar is loose on purpose. A block is a flat token sequence where bare text
//! names a parameter and the next `{...}` group is its value:
//!
//! ```text
//! Text("\n    name=")  Required("other name")  Text(",\n    description=")  Required("...")
//! ```
//!
//! The walk keeps a single pending name:
//!
//! | state         | bare text        | `{value}`                            | anything else |
//! |---------------|------------------|--------------------------------------|---------------|
//! | AwaitingName  | HaveName(name)   | error, stop                          | error, stop   |
//! | HaveName(n)   | HaveName(name)   | assign n (first value wins)          | error, stop   |
//!
//! Text that is empty once whitespace, commas and `=` are stripped leaves the state alone, and
//! a pending name left over at the end of the block is ignored (usually a trailing newline).

use crate::diagnostics::{Converted, Diagnostic, DiagnosticKind};
use crate::mapping::{FieldMapping, MacroKind};
use crate::markup::{Argument, MacroInvocation, Token};
use std::collections::BTreeMap;

/// A grammar error inside a parameter block, at the index of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockError {
    pub index: usize,
    pub message: String,
}

/// Result of walking one parameter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBlock {
    /// `(name, value)` pairs in block order, names unique.
    pub parameters: Vec<(String, String)>,
    pub errors: Vec<BlockError>,
}

impl ParameterBlock {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

enum State {
    AwaitingName,
    HaveName(String),
}

/// Parse a flat token sequence into named parameters.
pub fn parse_parameter_block(tokens: &[Token]) -> ParameterBlock {
    let mut block = ParameterBlock::default();
    let mut state = State::AwaitingName;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Text(text) => {
                let name = parameter_name(text);
                if !name.is_empty() {
                    state = State::HaveName(name);
                }
            }
            Token::Required(value) => match std::mem::replace(&mut state, State::AwaitingName) {
                State::HaveName(name) => {
                    if block.get(&name).is_some() {
                        block.errors.push(BlockError {
                            index,
                            message: format!("parameter '{name}' already defined"),
                        });
                    } else {
                        block.parameters.push((name, value.clone()));
                    }
                }
                State::AwaitingName => {
                    block.errors.push(BlockError {
                        index,
                        message: format!("expected a parameter name before '{token}'"),
                    });
                    break;
                }
            },
            Token::Optional(_) | Token::Command(_) => {
                block.errors.push(BlockError {
                    index,
                    message: format!(
                        "expected '{token}' to be a parameter name or required argument"
                    ),
                });
                break;
            }
        }
    }

    block
}

/// Strip the separators around a bare parameter name (`",\n  description="`).
fn parameter_name(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ',' && *c != '=')
        .collect::<String>()
        .trim()
        .to_string()
}

/// An invocation whose arity has been validated, not yet mapped to fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitInvocation<'a> {
    pub kind: MacroKind,
    pub id: &'a str,
    pub row: usize,
    /// `(logical name, value)` for the fixed positions after the identifier.
    pub positional: Vec<(&'static str, &'a str)>,
    /// Tokens of the parameter block, when the invocation has one.
    pub block: Option<&'a [Token]>,
}

/// Validate arity and argument kinds for `kind`, rejecting the whole invocation on failure.
///
/// `\newacronym` takes `{id}{abbreviation}{longname}` with an optional `[block]` in front;
/// `\newglossaryentry` takes exactly `{id}{block}`.
pub fn split_arguments(
    kind: MacroKind,
    invocation: &MacroInvocation,
) -> Result<SplitInvocation<'_>, Diagnostic> {
    let row = invocation.row;
    let args = &invocation.arguments;
    let fail = |message: String| {
        Diagnostic::new(DiagnosticKind::Structure, message).with_row(Some(row))
    };

    let (block, fixed) = match kind {
        MacroKind::Acronym => match args.len() {
            3 => (None, &args[..]),
            4 => match &args[0] {
                Argument::Optional(group) => (Some(group.tokens.as_slice()), &args[1..]),
                Argument::Required(_) => {
                    return Err(fail(
                        "could not parse acronym: expected optional first argument".to_string(),
                    ))
                }
            },
            n if n < 3 => {
                return Err(fail(format!(
                    "could not parse acronym: too few arguments ({n})"
                )))
            }
            n => {
                return Err(fail(format!(
                    "could not parse acronym: too many arguments ({n})"
                )))
            }
        },
        MacroKind::Glossary => {
            if args.len() != 2 {
                return Err(fail(format!(
                    "could not parse glossary entry (arguments != 2, found {})",
                    args.len()
                )));
            }
            match &args[1] {
                Argument::Required(group) => (Some(group.tokens.as_slice()), &args[..1]),
                Argument::Optional(_) => {
                    return Err(fail(
                        "could not parse glossary entry: parameter block must be a required argument"
                            .to_string(),
                    ))
                }
            }
        }
    };

    let mut values = Vec::with_capacity(fixed.len());
    for (position, argument) in fixed.iter().enumerate() {
        match argument {
            Argument::Required(group) => values.push(group.value.as_str()),
            Argument::Optional(_) => {
                return Err(fail(format!(
                    "could not parse {}: expected required argument at position {}",
                    kind.macro_name(),
                    position + 1
                )))
            }
        }
    }

    let id = values[0].trim();
    if id.is_empty() {
        return Err(fail(format!(
            "could not parse {}: empty key",
            kind.macro_name()
        )));
    }

    let positional = match kind {
        MacroKind::Acronym => vec![("abbreviation", values[1]), ("longname", values[2])],
        MacroKind::Glossary => Vec::new(),
    };

    Ok(SplitInvocation {
        kind,
        id,
        row,
        positional,
        block,
    })
}

impl SplitInvocation<'_> {
    /// Map positional values and block parameters onto BibTeX fields.
    ///
    /// Block grammar errors, unknown parameter names and parameters whose field is already
    /// filled become diagnostics; the entry is still built from everything else.
    pub fn assign_fields(&self, mapping: &FieldMapping) -> Converted<BTreeMap<String, String>> {
        let mut fields = BTreeMap::new();
        let mut diagnostics = Vec::new();
        let diagnostic = |kind: DiagnosticKind, message: String| {
            Diagnostic::new(kind, message)
                .with_key(self.id)
                .with_row(Some(self.row))
        };

        for (logical, value) in &self.positional {
            match mapping.field_for(logical) {
                Some(field) => {
                    fields.insert(field.to_string(), value.to_string());
                }
                None => diagnostics.push(diagnostic(
                    DiagnosticKind::UnrecognisedParameter,
                    format!("parameter '{logical}' in key '{}' not recognised", self.id),
                )),
            }
        }

        let block = self.block.map(parse_parameter_block).unwrap_or_default();
        for error in block.errors {
            diagnostics.push(diagnostic(
                DiagnosticKind::Structure,
                format!(
                    "error reading 'parameter' block of '{}' at token {}: {}",
                    self.id, error.index, error.message
                ),
            ));
        }

        for (name, value) in block.parameters {
            let Some(field) = mapping.field_for(&name) else {
                diagnostics.push(diagnostic(
                    DiagnosticKind::UnrecognisedParameter,
                    format!("parameter '{name}' in key '{}' not recognised", self.id),
                ));
                continue;
            };
            if fields.contains_key(field) {
                diagnostics.push(diagnostic(
                    DiagnosticKind::DuplicateParameter,
                    format!("duplicate parameter '{name}' in key '{}'", self.id),
                ));
                continue;
            }
            fields.insert(field.to_string(), value);
        }

        Converted::with_diagnostics(fields, diagnostics)
    }
}
