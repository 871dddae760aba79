//! Leaf conditions and actions for tactical behavior trees.
//!
//! The catalog is closed: [`resolve`] binds an [`AtomicCall`](c2sim_lang::AtomicCall)
//! from a syntax tree to an [`Atomic`] (or a decorator [`Transform`]) once, at
//! compile time. Evaluating an atomic is a pure function of an observation and
//! its context.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod params;
pub mod registry;
mod select;

pub use catalog::{Atomic, AttackTarget, Transform};
pub use error::CompileError;
pub use params::{
    Course, Direction, HpLevel, Negation, Param, Qualifier, Region, Subject, Team, UnitType,
};
pub use registry::{resolve, AtomicName, Resolved};
