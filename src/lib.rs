//! witherkit: generation-based lazy eviction for hierarchical cache trees.
//!
//! Nodes record the generation at which they were last touched; a sweep
//! purges subtrees older than a configured lifespan, comparing stamps safely
//! across clock wraparound. See [`policy::wither`] for the sweep and
//! [`traits`] for the capabilities a host node implements.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod tree;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
