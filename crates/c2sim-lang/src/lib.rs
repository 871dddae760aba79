//! Grammar and parser for the tactical behavior tree language.
//!
//! ```
//! let tree = c2sim_lang::parse("F(A(attack closest) :: A(stand))").unwrap();
//! assert_eq!(tree.root.kind(), "fallback");
//! assert_eq!(tree.node_count(), 3);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
mod grammar;
pub mod syntax;

pub use error::ParseError;
pub use grammar::MAX_DEPTH;
pub use syntax::{Arg, AtomicCall, Reference, Span, SyntaxNode, SyntaxTree};

use grammar::Input;

/// Parse one program into a syntax tree.
pub fn parse(text: &str) -> Result<SyntaxTree, ParseError> {
    match grammar::program(Input::new(text)) {
        Ok((_, root)) => {
            tracing::trace!(nodes = root.node_count(), "parsed behavior tree");
            Ok(SyntaxTree { root })
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.into_parse_error()),
        Err(nom::Err::Incomplete(_)) => Err(ParseError {
            offset: text.len(),
            line: text.lines().count().max(1) as u32,
            column: text.lines().last().map(|l| l.chars().count() + 1).unwrap_or(1),
            expected: "more input".to_string(),
            found: "end of input".to_string(),
        }),
    }
}
