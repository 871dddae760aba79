use std::borrow::Cow;

use nom::error::{ContextError, ErrorKind};
use thiserror::Error;

use crate::grammar::{Input, MAX_DEPTH};

/// Malformed program text. No partial tree is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {line}:{column}: expected {expected}, found {found}")]
pub struct ParseError {
    /// Byte offset into the source.
    pub offset: usize,
    pub line: u32,
    pub column: usize,
    pub expected: String,
    pub found: String,
}

/// Error threaded through the nom combinators.
///
/// Keeps the deepest failure position and the innermost label attached to it.
#[derive(Debug)]
pub(crate) struct GrammarError<'a> {
    pub(crate) input: Input<'a>,
    pub(crate) expected: Cow<'static, str>,
    labelled: bool,
}

impl<'a> GrammarError<'a> {
    pub(crate) fn too_deep(input: Input<'a>) -> Self {
        Self {
            input,
            expected: Cow::Owned(format!("nesting at most {MAX_DEPTH} deep")),
            labelled: true,
        }
    }

    pub(crate) fn into_parse_error(self) -> ParseError {
        let rest = self.input.fragment();
        let found: String = rest
            .split_whitespace()
            .next()
            .map(|tok| tok.chars().take(16).collect())
            .unwrap_or_else(|| "end of input".to_string());
        ParseError {
            offset: self.input.location_offset(),
            line: self.input.location_line(),
            column: self.input.get_utf8_column(),
            expected: self.expected.into_owned(),
            found,
        }
    }
}

fn describe(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Eof => "end of input",
        ErrorKind::Tag => "`::`",
        ErrorKind::TakeWhile1 | ErrorKind::Alpha => "a name",
        ErrorKind::Alt => "a node (`A(`, `C(`, `S(`, `F(` or `D(`)",
        _ => "valid syntax",
    }
}

impl<'a> nom::error::ParseError<Input<'a>> for GrammarError<'a> {
    fn from_error_kind(input: Input<'a>, kind: ErrorKind) -> Self {
        Self {
            input,
            expected: Cow::Borrowed(describe(kind)),
            labelled: false,
        }
    }

    fn append(_input: Input<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Input<'a>, c: char) -> Self {
        Self {
            input,
            expected: Cow::Owned(format!("`{c}`")),
            labelled: false,
        }
    }

    fn or(self, other: Self) -> Self {
        if other.input.location_offset() >= self.input.location_offset() {
            other
        } else {
            self
        }
    }
}

impl<'a> ContextError<Input<'a>> for GrammarError<'a> {
    fn add_context(input: Input<'a>, ctx: &'static str, mut other: Self) -> Self {
        if !other.labelled && other.input.location_offset() == input.location_offset() {
            other.expected = Cow::Borrowed(ctx);
            other.labelled = true;
        }
        other
    }
}
