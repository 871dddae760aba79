use c2sim_atomics::{Atomic, Transform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Depth-first position of a node in its graph, assigned at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u32);

/// Executable tree node. Children are owned, so graphs are acyclic by construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    Sequence {
        id: NodeId,
        children: Vec<Node>,
    },
    Fallback {
        id: NodeId,
        children: Vec<Node>,
    },
    Decorator {
        id: NodeId,
        transform: Transform,
        child: Box<Node>,
    },
    Leaf {
        id: NodeId,
        atomic: Atomic,
    },
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Sequence { id, .. }
            | Node::Fallback { id, .. }
            | Node::Decorator { id, .. }
            | Node::Leaf { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Sequence { children, .. } | Node::Fallback { children, .. } => children,
            Node::Decorator { child, .. } => core::slice::from_ref(child.as_ref()),
            Node::Leaf { .. } => &[],
        }
    }

    /// Preorder search; ids grow in preorder, so whole subtrees are skipped.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id() == id {
            return Some(self);
        }
        let children = self.children();
        let idx = children.partition_point(|c| c.id() <= id);
        idx.checked_sub(1).and_then(|i| children[i].find(id))
    }
}

/// A compiled tree: immutable, reusable across any number of ticks and threads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeGraph {
    pub(crate) root: Node,
    pub(crate) node_count: usize,
}

impl NodeGraph {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.root.find(id)
    }
}
