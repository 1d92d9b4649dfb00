//! Node types produced by the markup tokenizer

use std::fmt;

/// The contents of a `{...}` or `[...]` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The raw text between the delimiters.
    pub value: String,
    /// The top level of the same text as a flat token sequence (comments removed).
    pub tokens: Vec<Token>,
}

impl Group {
    pub fn new(value: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            value: value.into(),
            tokens,
        }
    }
}

/// One element of a group's flat token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of plain text.
    Text(String),
    /// A nested `{...}` group, as raw text.
    Required(String),
    /// A nested `[...]` group, as raw text.
    Optional(String),
    /// A control sequence such as `\textbf`, without the backslash.
    Command(String),
}

/// A macro argument, tagged by its delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Required(Group),
    Optional(Group),
}

impl Argument {
    pub fn group(&self) -> &Group {
        match self {
            Argument::Required(group) | Argument::Optional(group) => group,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Argument::Required(_))
    }
}

/// A macro found in the source, with the arguments that immediately follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation {
    /// Control sequence name, without the backslash.
    pub name: String,
    pub arguments: Vec<Argument>,
    /// 1-based line of the backslash.
    pub row: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => f.write_str(text),
            Token::Required(value) => write!(f, "{{{value}}}"),
            Token::Optional(value) => write!(f, "[{value}]"),
            Token::Command(name) => write!(f, "\\{name}"),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Required(group) => write!(f, "{{{}}}", group.value),
            Argument::Optional(group) => write!(f, "[{}]", group.value),
        }
    }
}

impl fmt::Display for MacroInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.name)?;
        for argument in &self.arguments {
            write!(f, "{argument}")?;
        }
        Ok(())
    }
}
