use c2sim_atomics::{resolve, CompileError, Resolved};
use c2sim_lang::{AtomicCall, ParseError, Span, SyntaxNode, SyntaxTree};
use thiserror::Error;

use crate::node::{Node, NodeGraph, NodeId};

/// Failure to turn program text into a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Bind every atomic in `tree` and number the nodes depth-first.
///
/// Atomics are resolved and validated here and never evaluated.
pub fn compile(tree: &SyntaxTree) -> Result<NodeGraph, CompileError> {
    let mut next = 0u32;
    let root = build(&tree.root, &mut next)?;
    tracing::debug!(nodes = next, root = tree.root.kind(), "compiled behavior tree");
    Ok(NodeGraph {
        root,
        node_count: next as usize,
    })
}

pub fn compile_str(text: &str) -> Result<NodeGraph, BuildError> {
    let tree = c2sim_lang::parse(text)?;
    Ok(compile(&tree)?)
}

fn build(node: &SyntaxNode, next: &mut u32) -> Result<Node, CompileError> {
    let id = NodeId(*next);
    *next += 1;

    match node {
        SyntaxNode::Sequence { children, .. } => Ok(Node::Sequence {
            id,
            children: build_all(children, next)?,
        }),
        SyntaxNode::Fallback { children, .. } => Ok(Node::Fallback {
            id,
            children: build_all(children, next)?,
        }),
        SyntaxNode::Action { span, call } => leaf(id, call, *span, true),
        SyntaxNode::Condition { span, call } => leaf(id, call, *span, false),
        SyntaxNode::Decorator { span, call, child } => match resolve(call, *span)? {
            Resolved::Transform(transform) => Ok(Node::Decorator {
                id,
                transform,
                child: Box::new(build(child, next)?),
            }),
            other => Err(wrong_kind(call, *span, "a decorator transform", &other)),
        },
    }
}

fn build_all(children: &[SyntaxNode], next: &mut u32) -> Result<Vec<Node>, CompileError> {
    children.iter().map(|child| build(child, next)).collect()
}

fn leaf(id: NodeId, call: &AtomicCall, span: Span, action: bool) -> Result<Node, CompileError> {
    match resolve(call, span)? {
        Resolved::Leaf(atomic) if atomic.is_action() == action => Ok(Node::Leaf { id, atomic }),
        other => {
            let expected = if action { "an action" } else { "a condition" };
            Err(wrong_kind(call, span, expected, &other))
        }
    }
}

fn wrong_kind(call: &AtomicCall, span: Span, expected: &'static str, found: &Resolved) -> CompileError {
    CompileError::WrongKind {
        name: call.name.clone(),
        expected,
        found: found.kind(),
        span,
    }
}
