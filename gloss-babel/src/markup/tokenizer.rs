//! LaTeX macro tokenizer
//!
//! This is not a LaTeX parser. It locates control sequences by name and collects
//! the `{...}` and `[...]` groups that immediately follow them (separated by spaces or tabs at
//! most). Group contents are split into a flat [`Token`] sequence; only the top level is
//! split, a nested group is kept whole as its raw text.
//!
//! Recognised lexical rules:
//! - `%` starts a comment running to the end of the line, outside and inside groups
//! - `\{`, `\}`, `\%` and every other backslash-symbol pair are escapes, never delimiters
//! - unbalanced braces inside a located macro are a parse error
//! - groups nest at most [`MAX_NESTING`] deep
//!
//! Delimiter matching is a loop over the bytes, so every argument is scanned a bounded
//! number of times whatever its depth.

use super::nodes::{Argument, Group, MacroInvocation, Token};
use crate::error::FormatError;
use memchr::{memchr, memchr2, memchr_iter};

/// Deepest `{`/`[` nesting accepted within one argument, the argument itself included.
pub const MAX_NESTING: usize = 256;

/// Find every invocation of the macros in `names`, in source order.
pub fn find_invocations(source: &str, names: &[&str]) -> Result<Vec<MacroInvocation>, FormatError> {
    let bytes = source.as_bytes();
    let mut invocations = Vec::new();
    let mut lines = LineCounter::default();
    let mut pos = 0;

    while let Some(offset) = memchr2(b'\\', b'%', &bytes[pos..]) {
        let at = pos + offset;
        if bytes[at] == b'%' {
            pos = skip_comment(bytes, at);
            continue;
        }

        let (name, after) = control_sequence(source, at);
        if !names.contains(&name) {
            pos = after;
            continue;
        }

        let row = lines.row_at(bytes, at);
        let (arguments, end) = take_arguments(source, after).map_err(|msg| {
            FormatError::ParseError(format!("(row {row}) {msg} in \\{name}"))
        })?;
        tracing::trace!(name, row, arguments = arguments.len(), "found macro");
        invocations.push(MacroInvocation {
            name: name.to_string(),
            arguments,
            row,
        });
        pos = end;
    }

    Ok(invocations)
}

/// Split group contents into text runs, nested groups and control sequences.
pub fn tokenize(content: &str) -> Result<Vec<Token>, String> {
    let bytes = content.as_bytes();
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut pos = 0;

    let flush = |tokens: &mut Vec<Token>, from: usize, to: usize| {
        if from < to {
            tokens.push(Token::Text(content[from..to].to_string()));
        }
    };

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                flush(&mut tokens, run_start, pos);
                let close = matching_close(bytes, pos)?;
                tokens.push(Token::Required(content[pos + 1..close].to_string()));
                pos = close + 1;
                run_start = pos;
            }
            b'}' => return Err("unexpected '}'".to_string()),
            b'[' => match matching_close(bytes, pos) {
                Ok(close) => {
                    flush(&mut tokens, run_start, pos);
                    tokens.push(Token::Optional(content[pos + 1..close].to_string()));
                    pos = close + 1;
                    run_start = pos;
                }
                // a lone '[' is ordinary text
                Err(_) => pos += 1,
            },
            b'\\' => {
                let (name, after) = control_sequence(content, pos);
                if is_command_name(name) {
                    flush(&mut tokens, run_start, pos);
                    tokens.push(Token::Command(name.to_string()));
                    run_start = after;
                }
                pos = after;
            }
            b'%' => {
                flush(&mut tokens, run_start, pos);
                pos = skip_comment(bytes, pos);
                run_start = pos;
            }
            _ => pos += 1,
        }
    }
    flush(&mut tokens, run_start, bytes.len());

    Ok(tokens)
}

/// Check that `value` reads back unchanged once written as `{value}`.
///
/// Rejects an unescaped `%`, a trailing lone backslash, braces that do not balance with
/// escapes honoured, and nesting beyond [`MAX_NESTING`].
pub fn check_group_content(value: &str) -> Result<(), String> {
    let bytes = value.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if pos + 1 == bytes.len() => {
                return Err("ends with a lone '\\'".to_string());
            }
            b'\\' => {
                pos += 2;
                continue;
            }
            b'%' => return Err("holds an unescaped '%'".to_string()),
            b'{' => {
                depth += 1;
                // the wrapping group takes one level
                if depth + 1 >= MAX_NESTING {
                    return Err(format!("nests groups deeper than {MAX_NESTING}"));
                }
            }
            b'}' if depth == 0 => return Err("has an unbalanced '}'".to_string()),
            b'}' => depth -= 1,
            _ => {}
        }
        pos += 1;
    }

    if depth == 0 {
        Ok(())
    } else {
        Err("has an unbalanced '{'".to_string())
    }
}

fn take_arguments(source: &str, start: usize) -> Result<(Vec<Argument>, usize), String> {
    let bytes = source.as_bytes();
    let mut arguments = Vec::new();
    let mut end = start;

    loop {
        let mut next = end;
        while matches!(bytes.get(next), Some(b' ' | b'\t')) {
            next += 1;
        }
        let optional = match bytes.get(next) {
            Some(b'{') => false,
            Some(b'[') => true,
            _ => break,
        };

        let close = matching_close(bytes, next)?;
        let inner = &source[next + 1..close];
        let group = Group::new(inner, tokenize(inner)?);
        arguments.push(if optional {
            Argument::Optional(group)
        } else {
            Argument::Required(group)
        });
        end = close + 1;
    }

    Ok((arguments, end))
}

/// Index of the delimiter closing the group opened at `open` (`{` or `[`).
///
/// Braces nest inside brackets, so `[a={]}]` closes at the last byte.
fn matching_close(bytes: &[u8], open: usize) -> Result<usize, String> {
    let bracketed = bytes[open] == b'[';
    let mut braces = 0usize;
    let mut brackets = 0usize;
    let mut pos = open + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'%' => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'{' => {
                braces += 1;
                if braces + brackets >= MAX_NESTING {
                    return Err(format!("groups nested deeper than {MAX_NESTING}"));
                }
            }
            b'}' if braces == 0 => {
                return if bracketed {
                    Err("unexpected '}' inside '[...]'".to_string())
                } else {
                    Ok(pos)
                };
            }
            b'}' => braces -= 1,
            b'[' if bracketed && braces == 0 => {
                brackets += 1;
                if brackets >= MAX_NESTING {
                    return Err(format!("groups nested deeper than {MAX_NESTING}"));
                }
            }
            b']' if bracketed && braces == 0 => {
                if brackets == 0 {
                    return Ok(pos);
                }
                brackets -= 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(if bracketed {
        "unterminated '[' group".to_string()
    } else {
        "unterminated '{' group".to_string()
    })
}

/// The control sequence starting at the backslash `at`, and the index just past it.
///
/// Letter sequences (`\newacronym`) are read greedily; anything else is a one-character
/// escape (`\%`, `\\`, `\{`).
fn control_sequence(source: &str, at: usize) -> (&str, usize) {
    let bytes = source.as_bytes();
    let start = at + 1;
    let letters = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphabetic() || **b == b'@')
        .count();
    if letters > 0 {
        return (&source[start..start + letters], start + letters);
    }
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    (&source[start..start + width], start + width)
}

fn is_command_name(name: &str) -> bool {
    name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic() || b == b'@')
}

/// Index just past the newline ending the comment at `at`.
fn skip_comment(bytes: &[u8], at: usize) -> usize {
    match memchr(b'\n', &bytes[at..]) {
        Some(offset) => at + offset + 1,
        None => bytes.len(),
    }
}

/// Incremental 1-based line numbering for monotonically increasing offsets.
#[derive(Default)]
struct LineCounter {
    offset: usize,
    newlines: usize,
}

impl LineCounter {
    fn row_at(&mut self, bytes: &[u8], at: usize) -> usize {
        self.newlines += memchr_iter(b'\n', &bytes[self.offset..at]).count();
        self.offset = at;
        self.newlines + 1
    }
}
