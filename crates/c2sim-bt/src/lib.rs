//! Compiler and evaluation engines for tactical behavior trees.
//!
//! Program text is parsed by `c2sim-lang`, bound against the `c2sim-atomics`
//! catalog by [`compile`], and ticked by [`tick`] (scalar, short-circuit),
//! [`tick_exhaustive`] (every node evaluated) or [`TreeBank::tick_batch`]
//! (many members, each selecting one of several candidate trees).
//!
//! ```
//! use c2sim_bt::compile_str;
//!
//! let graph = compile_str("F(A(attack closest) :: A(stand))").unwrap();
//! assert_eq!(graph.node_count(), 3);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod batch;
pub mod compile;
pub mod engine;
pub mod node;

pub use batch::{BatchMember, TreeBank};
pub use c2sim_atomics::CompileError;
pub use compile::{compile, compile_str, BuildError};
pub use engine::{tick, tick_exhaustive, tick_traced, Decision};
pub use node::{Node, NodeGraph, NodeId};
