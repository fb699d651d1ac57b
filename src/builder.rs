//! Configuration and builder for generation tracking.
//!
//! Provides a fluent API for assembling a validated [`GenerationState`] and a
//! plain [`GenerationConfig`] record for callers that load settings from
//! elsewhere (enable the `serde` feature to deserialize it).
//!
//! ## Example
//!
//! ```rust
//! use witherkit::builder::GenerationBuilder;
//!
//! let state = GenerationBuilder::new(1_000)
//!     .life_span(64)
//!     .neighboring_links(true)
//!     .build();
//! assert!(state.is_tracking());
//! assert_eq!(state.life_span(), Some(64));
//! ```
//!
//! ## Parameters
//!
//! | Field                | Type          | Default                  | Description                          |
//! |----------------------|---------------|--------------------------|--------------------------------------|
//! | `max_generation`     | `u32`         | `DEFAULT_MAX_GENERATION` | Clock modulus                        |
//! | `initial_generation` | `u32`         | 0                        | Clock value at construction          |
//! | `life_span`          | `Option<u32>` | `None`                   | Max age before withering; off if unset or 0 |
//! | `neighboring_links`  | `bool`        | false                    | Repair skew from lateral links       |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ds::generation::{DEFAULT_MAX_GENERATION, Generation, GenerationState};
use crate::error::ConfigError;

/// Plain configuration record for generation tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    pub max_generation: u32,
    pub initial_generation: Generation,
    pub life_span: Option<u32>,
    pub neighboring_links: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_generation: DEFAULT_MAX_GENERATION,
            initial_generation: 0,
            life_span: None,
            neighboring_links: false,
        }
    }
}

impl GenerationConfig {
    /// Validates the record and produces the shared clock state.
    pub fn try_into_state(self) -> Result<GenerationState, ConfigError> {
        if self.max_generation == 0 {
            return Err(ConfigError::new("max_generation must be > 0"));
        }
        if self.initial_generation >= self.max_generation {
            return Err(ConfigError::new(format!(
                "initial_generation {} must be < max_generation {}",
                self.initial_generation, self.max_generation
            )));
        }
        if let Some(span) = self.life_span {
            if span >= self.max_generation {
                return Err(ConfigError::new(format!(
                    "life_span {} must be < max_generation {}",
                    span, self.max_generation
                )));
            }
            if span == 0 {
                warn!("life_span of 0 disables generation tracking");
            }
        }
        Ok(GenerationState::from_validated(
            self.initial_generation,
            self.max_generation,
            self.life_span,
            self.neighboring_links,
        ))
    }
}

/// Builder for [`GenerationState`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationBuilder {
    config: GenerationConfig,
}

impl GenerationBuilder {
    /// Create a builder whose clock wraps at `max_generation`.
    pub fn new(max_generation: u32) -> Self {
        Self {
            config: GenerationConfig {
                max_generation,
                ..GenerationConfig::default()
            },
        }
    }

    /// Start from an existing configuration record.
    pub fn from_config(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Enable eviction of nodes older than `life_span` generations.
    pub fn life_span(mut self, life_span: u32) -> Self {
        self.config.life_span = Some(life_span);
        self
    }

    /// Set the clock value the tree starts at.
    pub fn starting_at(mut self, generation: Generation) -> Self {
        self.config.initial_generation = generation;
        self
    }

    /// Declare that nodes can be reached through lateral links.
    pub fn neighboring_links(mut self, enabled: bool) -> Self {
        self.config.neighboring_links = enabled;
        self
    }

    /// Returns the configuration assembled so far.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Build the state, reporting invalid parameters.
    pub fn try_build(self) -> Result<GenerationState, ConfigError> {
        self.config.try_into_state()
    }

    /// Build the state.
    ///
    /// # Panics
    ///
    /// Panics if the parameters are invalid; use [`try_build`](Self::try_build)
    /// for user-supplied configuration.
    pub fn build(self) -> GenerationState {
        match self.try_build() {
            Ok(state) => state,
            Err(err) => panic!("invalid generation config: {err}"),
        }
    }
}

impl Default for GenerationBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GENERATION)
    }
}
