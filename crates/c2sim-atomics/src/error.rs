use c2sim_lang::Span;
use thiserror::Error;

/// A syntax tree that names something the catalog cannot bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{span}: unknown atomic `{name}`")]
    UnknownAtomic { name: String, span: Span },

    #[error("{span}: invalid parameter for `{atomic}`: {reason}")]
    InvalidParameter {
        atomic: String,
        reason: String,
        span: Span,
    },

    /// An atomic used in a position of the wrong kind, e.g. a transform as a leaf.
    #[error("{span}: `{name}` is {found}, expected {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
        span: Span,
    },
}
