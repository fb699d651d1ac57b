//! Error types for the witherkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when generation-tracking parameters are invalid
//!   (e.g. zero modulus, a lifespan that can never be exceeded).
//! - [`InvariantError`]: Returned when host tree invariants are violated
//!   (debug-only `check_invariants` methods).
//!
//! The eviction policy itself never fails: degenerate inputs fall back to
//! no-ops, so errors only surface at configuration time and from explicit
//! invariant checks.
//!
//! ## Example Usage
//!
//! ```
//! use witherkit::builder::GenerationBuilder;
//! use witherkit::error::ConfigError;
//!
//! let state: Result<_, ConfigError> = GenerationBuilder::new(100).life_span(10).try_build();
//! assert!(state.is_ok());
//!
//! // A lifespan at or beyond the modulus could never be exceeded
//! let bad = GenerationBuilder::new(100).life_span(100).try_build();
//! assert!(bad.is_err());
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when generation configuration parameters are invalid.
///
/// Produced by [`GenerationBuilder::try_build`](crate::builder::GenerationBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use witherkit::builder::GenerationBuilder;
///
/// let err = GenerationBuilder::new(0).try_build().unwrap_err();
/// assert!(err.to_string().contains("max_generation"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when tree invariants are violated.
///
/// Produced by [`CacheNode::check_invariants`](crate::tree::CacheNode::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
