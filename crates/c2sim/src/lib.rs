//! Umbrella crate that re-exports the `c2sim-*` building blocks.
//!
//! Also home to the run-level helpers: [`RunConfig`] and, with the `bt`
//! feature, tree bank loading.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub mod bank;

pub use config::RunConfig;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use bank::{bank_from_yaml, load_bank};

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use c2sim_core as core;

#[cfg(feature = "lang")]
#[cfg_attr(docsrs, doc(cfg(feature = "lang")))]
pub use c2sim_lang as lang;

#[cfg(feature = "atomics")]
#[cfg_attr(docsrs, doc(cfg(feature = "atomics")))]
pub use c2sim_atomics as atomics;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use c2sim_bt as bt;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use c2sim_tools as tools;
