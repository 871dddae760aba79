//! Deterministic data model for tactical behavior trees.
//!
//! Everything here is plain data handed to a tick: the tri-state [`Status`], the
//! environment's [`Action`] codes, shape-checked observation views and the
//! read-only per-tick [`Context`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod observation;
pub mod rng;
pub mod status;
pub mod terrain;

pub use context::{AgentInfo, Context, EnvInfo, Side};
pub use error::PreconditionViolation;
pub use observation::{ObservationBuf, ObservationLayout, ObservationView, Row};
pub use rng::{DeterministicRng, SplitMix64};
pub use status::{Action, Heading, Status};
pub use terrain::Terrain;
