//! Tick engines.
//!
//! Every tick recomputes from the root; nothing persists between ticks, so a
//! `Running` child is evaluated afresh rather than resumed.

use c2sim_core::{Action, Context, ObservationView, Status};
use c2sim_tools::{NullTraceSink, TraceEvent, TraceSink};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeGraph, NodeId};

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decision {
    pub status: Status,
    pub action: Action,
    /// Node that determined `status` and `action`.
    pub node: NodeId,
}

impl Decision {
    pub fn new(status: Status, action: Action, node: NodeId) -> Self {
        Self {
            status,
            action,
            node,
        }
    }
}

impl Node {
    /// Short-circuit evaluation of this subtree.
    ///
    /// # Panics
    ///
    /// If `obs` was observed under team sizes or a side other than `ctx`'s.
    pub fn tick(&self, obs: &ObservationView<'_>, ctx: &Context<'_>) -> Decision {
        observed_under(obs, ctx);
        eval(self, obs, ctx, &mut NullTraceSink)
    }
}

/// Scalar tick: children run in declared order and stop at the first deciding one.
///
/// # Panics
///
/// If `obs` was observed under team sizes or a side other than `ctx`'s.
pub fn tick(graph: &NodeGraph, obs: &ObservationView<'_>, ctx: &Context<'_>) -> Decision {
    graph.root.tick(obs, ctx)
}

/// Like [`tick`], reporting leaves, decorator rewrites and the deciding node to `sink`.
pub fn tick_traced(
    graph: &NodeGraph,
    obs: &ObservationView<'_>,
    ctx: &Context<'_>,
    sink: &mut dyn TraceSink,
) -> Decision {
    observed_under(obs, ctx);
    let decision = eval(&graph.root, obs, ctx, sink);
    sink.emit(TraceEvent::fired(
        ctx.tick,
        decision.node.0,
        decision.action.code(),
    ));
    decision
}

/// Evaluate every node, then pick each composite's result by first-match mask.
///
/// Same [`Decision`] as [`tick`]; the cost no longer depends on the data.
pub fn tick_exhaustive(graph: &NodeGraph, obs: &ObservationView<'_>, ctx: &Context<'_>) -> Decision {
    observed_under(obs, ctx);
    eval_all(&graph.root, obs, ctx)
}

fn observed_under(obs: &ObservationView<'_>, ctx: &Context<'_>) {
    if let Err(violation) = ctx.check(obs) {
        panic!("{violation}");
    }
}

pub(crate) fn status_code(status: Status) -> u32 {
    match status {
        Status::Success => 0,
        Status::Failure => 1,
        Status::Running => 2,
    }
}

fn eval<S: TraceSink + ?Sized>(
    node: &Node,
    obs: &ObservationView<'_>,
    ctx: &Context<'_>,
    sink: &mut S,
) -> Decision {
    match node {
        Node::Leaf { id, atomic } => {
            let (status, action) = atomic.evaluate(obs, ctx);
            sink.emit(TraceEvent::leaf(ctx.tick, id.0, action.code()));
            Decision::new(status, action, *id)
        }
        Node::Sequence { id, children } => {
            let mut last = Decision::new(Status::Success, Action::STAND, *id);
            for child in children {
                let decision = eval(child, obs, ctx, sink);
                if decision.status != Status::Success {
                    return decision;
                }
                last = decision;
            }
            last
        }
        Node::Fallback { id, children } => {
            for child in children {
                let decision = eval(child, obs, ctx, sink);
                if decision.status != Status::Failure {
                    return decision;
                }
            }
            Decision::new(Status::Failure, Action::STAND, *id)
        }
        Node::Decorator {
            id,
            transform,
            child,
        } => {
            let inner = eval(child, obs, ctx, sink);
            let (status, action) = transform.apply(inner.status, inner.action);
            sink.emit(TraceEvent::decorator(ctx.tick, id.0, status_code(status)));
            Decision::new(status, action, *id)
        }
    }
}

fn eval_all(node: &Node, obs: &ObservationView<'_>, ctx: &Context<'_>) -> Decision {
    match node {
        Node::Leaf { id, atomic } => {
            let (status, action) = atomic.evaluate(obs, ctx);
            Decision::new(status, action, *id)
        }
        Node::Sequence { id, children } => {
            let init = Decision::new(Status::Success, Action::STAND, *id);
            let (hit, last) = masked(children, obs, ctx, init, |d| d.status != Status::Success);
            hit.unwrap_or(last)
        }
        Node::Fallback { id, children } => {
            let init = Decision::new(Status::Failure, Action::STAND, *id);
            let (hit, _) = masked(children, obs, ctx, init, |d| d.status != Status::Failure);
            hit.unwrap_or(init)
        }
        Node::Decorator {
            id,
            transform,
            child,
        } => {
            let inner = eval_all(child, obs, ctx);
            let (status, action) = transform.apply(inner.status, inner.action);
            Decision::new(status, action, *id)
        }
    }
}

/// All children evaluated; returns the first one matching `decides` and the last one.
fn masked(
    children: &[Node],
    obs: &ObservationView<'_>,
    ctx: &Context<'_>,
    init: Decision,
    decides: impl Fn(&Decision) -> bool,
) -> (Option<Decision>, Decision) {
    children
        .iter()
        .map(|child| eval_all(child, obs, ctx))
        .fold((None, init), |(hit, _), d| {
            let hit = hit.or_else(|| decides(&d).then_some(d));
            (hit, d)
        })
}
