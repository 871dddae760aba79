//! # Grammar
//!
//! ```text
//! node      := action | condition | sequence | fallback | decorator
//! sequence  := "S" "(" nodes ")"
//! fallback  := "F" "(" nodes ")"
//! nodes     := node ("::" node)*
//! action    := "A" "(" atomic ")"
//! condition := "C" "(" atomic ")"
//! decorator := "D" "(" atomic node ")"
//! atomic    := NAME ARG*
//! ```
//!
//! The start token decides the node kind, so the parser never backtracks
//! once it has seen `X(`: everything after the opening parenthesis is
//! committed with `cut`. `//` comments run to the end of the line.
//!
//! Nesting is limited to [`MAX_DEPTH`] levels, the root counting as one.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{all_consuming, cut, map, not, recognize, value},
    error::context,
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use nom_locate::{position, LocatedSpan};

use crate::error::GrammarError;
use crate::syntax::{Arg, AtomicCall, Reference, Span, SyntaxNode};

pub(crate) type Input<'a> = LocatedSpan<&'a str>;
type PResult<'a, T> = IResult<Input<'a>, T, GrammarError<'a>>;

/// Deepest node a program may contain.
pub const MAX_DEPTH: usize = 64;

fn comment(input: Input) -> PResult<()> {
    value((), pair(tag("//"), take_while(|c| c != '\n')))(input)
}

fn ws(input: Input) -> PResult<()> {
    value((), many0_count(alt((value((), multispace1), comment))))(input)
}

fn identifier(input: Input) -> PResult<Input> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn quoted(input: Input) -> PResult<Arg> {
    map(
        preceded(
            char('"'),
            cut(terminated(take_while(|c| c != '"'), char('"'))),
        ),
        |s: Input| Arg::Quoted(s.fragment().to_string()),
    )(input)
}

/// A bare word, unless it opens a node (`C(...)`).
fn word(input: Input) -> PResult<Arg> {
    map(
        terminated(identifier, not(preceded(ws, char('(')))),
        |s: Input| match Reference::classify(s.fragment()) {
            Some(r) => Arg::Ref(r),
            None => Arg::Word(s.fragment().to_string()),
        },
    )(input)
}

fn atomic(input: Input) -> PResult<AtomicCall> {
    let (input, name) = context("an atomic name", identifier)(input)?;
    let (input, args) = many0(preceded(ws, alt((quoted, word))))(input)?;
    Ok((
        input,
        AtomicCall {
            name: name.fragment().to_string(),
            args,
        },
    ))
}

fn open<'a>(kind: char) -> impl FnMut(Input<'a>) -> PResult<'a, ()> {
    move |input| value((), pair(char(kind), pair(ws, char('('))))(input)
}

fn close(input: Input) -> PResult<()> {
    value((), preceded(ws, char(')')))(input)
}

fn nodes(input: Input, depth: usize) -> PResult<Vec<SyntaxNode>> {
    let mut children = Vec::new();
    if close(input).is_ok() {
        return Ok((input, children));
    }
    let (mut input, first) = preceded(ws, |i| node(i, depth))(input)?;
    children.push(first);

    loop {
        match preceded(ws, tag("::"))(input) {
            Ok((rest, _)) => {
                let (rest, child) = cut(preceded(ws, |i| node(i, depth)))(rest)?;
                children.push(child);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, children)),
            Err(e) => return Err(e),
        }
    }
}

fn span_of(pos: Input) -> Span {
    Span {
        offset: pos.location_offset(),
        line: pos.location_line(),
        column: pos.get_utf8_column(),
    }
}

fn group<'a, O>(
    kind: char,
    mut inner: impl FnMut(Input<'a>) -> PResult<'a, O>,
) -> impl FnMut(Input<'a>) -> PResult<'a, (Span, O)> {
    move |input| {
        let (input, pos) = position(input)?;
        let (input, _) = open(kind)(input)?;
        let (input, out) = cut(|i| {
            let (i, _) = ws(i)?;
            let (i, out) = inner(i)?;
            let (i, _) = close(i)?;
            Ok((i, out))
        })(input)?;
        Ok((input, (span_of(pos), out)))
    }
}

fn decorated(input: Input, depth: usize) -> PResult<(AtomicCall, SyntaxNode)> {
    let (input, call) = atomic(input)?;
    let (input, child) = preceded(ws, |i| node(i, depth))(input)?;
    Ok((input, (call, child)))
}

/// One node at `depth`; its children sit one level further down.
pub(crate) fn node(input: Input, depth: usize) -> PResult<SyntaxNode> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(GrammarError::too_deep(input)));
    }
    let below = depth + 1;
    context(
        "a node (`A(`, `C(`, `S(`, `F(` or `D(`)",
        alt((
            map(group('S', move |i| nodes(i, below)), |(span, children)| {
                SyntaxNode::Sequence { span, children }
            }),
            map(group('F', move |i| nodes(i, below)), |(span, children)| {
                SyntaxNode::Fallback { span, children }
            }),
            map(group('A', atomic), |(span, call)| SyntaxNode::Action { span, call }),
            map(group('C', atomic), |(span, call)| SyntaxNode::Condition { span, call }),
            map(group('D', move |i| decorated(i, below)), |(span, (call, child))| {
                SyntaxNode::Decorator {
                    span,
                    call,
                    child: Box::new(child),
                }
            }),
        )),
    )(input)
}

pub(crate) fn program(input: Input) -> PResult<SyntaxNode> {
    all_consuming(delimited(ws, |i| node(i, 1), ws))(input)
}
