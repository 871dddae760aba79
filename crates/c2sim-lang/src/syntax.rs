use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Source location of a node's start token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    pub offset: usize,
    pub line: u32,
    pub column: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxTree {
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SyntaxNode {
    Sequence {
        span: Span,
        children: Vec<SyntaxNode>,
    },
    Fallback {
        span: Span,
        children: Vec<SyntaxNode>,
    },
    Action {
        span: Span,
        call: AtomicCall,
    },
    Condition {
        span: Span,
        call: AtomicCall,
    },
    Decorator {
        span: Span,
        call: AtomicCall,
        child: Box<SyntaxNode>,
    },
}

impl SyntaxNode {
    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Sequence { span, .. }
            | SyntaxNode::Fallback { span, .. }
            | SyntaxNode::Action { span, .. }
            | SyntaxNode::Condition { span, .. }
            | SyntaxNode::Decorator { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxNode::Sequence { .. } => "sequence",
            SyntaxNode::Fallback { .. } => "fallback",
            SyntaxNode::Action { .. } => "action",
            SyntaxNode::Condition { .. } => "condition",
            SyntaxNode::Decorator { .. } => "decorator",
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            SyntaxNode::Sequence { children, .. } | SyntaxNode::Fallback { children, .. } => {
                1 + children.iter().map(SyntaxNode::node_count).sum::<usize>()
            }
            SyntaxNode::Action { .. } | SyntaxNode::Condition { .. } => 1,
            SyntaxNode::Decorator { child, .. } => 1 + child.node_count(),
        }
    }
}

/// `NAME ARG*` as written in the source; names and values are resolved by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtomicCall {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum Arg {
    Word(String),
    Quoted(String),
    Ref(Reference),
}

impl Arg {
    /// Text of a keyword-like argument; quoting is only a spelling choice.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Arg::Word(s) | Arg::Quoted(s) => Some(s),
            Arg::Ref(Reference::SelfRef) => Some("self"),
            Arg::Ref(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Word(s) => f.write_str(s),
            Arg::Quoted(s) => write!(f, "\"{s}\""),
            Arg::Ref(r) => write!(f, "{r}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reference {
    SelfRef,
    Enemy(usize),
    Friend(usize),
}

impl Reference {
    pub fn classify(word: &str) -> Option<Self> {
        if word == "self" {
            return Some(Reference::SelfRef);
        }
        let (prefix, digits) = word.rsplit_once('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let slot = digits.parse().ok()?;
        match prefix {
            "enemy" => Some(Reference::Enemy(slot)),
            "friend" => Some(Reference::Friend(slot)),
            _ => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::SelfRef => f.write_str("self"),
            Reference::Enemy(n) => write!(f, "enemy_{n}"),
            Reference::Friend(n) => write!(f, "friend_{n}"),
        }
    }
}

/// Canonical source text; parsing it yields the same structure.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::Sequence { children, .. } => write_group(f, 'S', children),
            SyntaxNode::Fallback { children, .. } => write_group(f, 'F', children),
            SyntaxNode::Action { call, .. } => write!(f, "A({call})"),
            SyntaxNode::Condition { call, .. } => write!(f, "C({call})"),
            SyntaxNode::Decorator { call, child, .. } => write!(f, "D({call} {child})"),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, tag: char, children: &[SyntaxNode]) -> fmt::Result {
    write!(f, "{tag}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(" :: ")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for AtomicCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
