//! Trace events for behavior tree ticks.
//!
//! The engine reports what it evaluated through a [`TraceSink`]; rendering and
//! inspection are left to the caller.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{KindFilter, NullTraceSink, TraceEvent, TraceKind, TraceLog, TraceSink};
