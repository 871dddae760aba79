use c2sim_core::{Action, Context, ObservationView, PreconditionViolation, Status};
use rayon::prelude::*;

use crate::engine::Decision;
use crate::node::{NodeGraph, NodeId};

/// One slot of a batched tick: which candidate tree applies, and its inputs.
#[derive(Debug, Clone, Copy)]
pub struct BatchMember<'a> {
    pub index: usize,
    pub obs: ObservationView<'a>,
    pub ctx: Context<'a>,
}

/// Named candidate graphs, addressed by insertion index.
#[derive(Debug, Clone, Default)]
pub struct TreeBank {
    names: Vec<String>,
    graphs: Vec<NodeGraph>,
}

impl TreeBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the added graph.
    pub fn push(&mut self, name: impl Into<String>, graph: NodeGraph) -> usize {
        self.names.push(name.into());
        self.graphs.push(graph);
        self.graphs.len() - 1
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NodeGraph> {
        self.graphs.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Tick every candidate for every member, then keep the candidate each member selects.
    ///
    /// Members are independent and evaluated in parallel. Output order follows `members`.
    /// Every member is checked before any tree runs: an out-of-range index or a
    /// view observed under another context rejects the whole batch.
    pub fn tick_batch(
        &self,
        members: &[BatchMember<'_>],
    ) -> Result<Vec<Decision>, PreconditionViolation> {
        if let Some((member, m)) = members
            .iter()
            .enumerate()
            .find(|(_, m)| m.index >= self.graphs.len())
        {
            return Err(PreconditionViolation::TreeIndex {
                member,
                index: m.index,
                len: self.graphs.len(),
            });
        }
        for m in members {
            m.ctx.check(&m.obs)?;
        }
        tracing::trace!(
            members = members.len(),
            candidates = self.graphs.len(),
            "batched tick"
        );

        Ok(members
            .par_iter()
            .map(|m| {
                let mut selected = Decision::new(Status::Failure, Action::STAND, NodeId::default());
                for (k, graph) in self.graphs.iter().enumerate() {
                    let decision = graph.root().tick(&m.obs, &m.ctx);
                    if k == m.index {
                        selected = decision;
                    }
                }
                selected
            })
            .collect())
    }
}
