//! Wrapping generation clock and wraparound-safe age comparison.
//!
//! A generation is a logical clock tick drawn from the cyclic range
//! `[0, max_generation)`. The clock is owned by the tree and passed by
//! reference into every eviction and rejuvenation call; nothing here is
//! global state.
//!
//! ## Architecture
//!
//! ```text
//!   max_generation = 100, current = 5
//!
//!     0    5                                      98  99
//!     ├────┼───────────────────────────────────────┼───┤
//!     │ ≤c │                  > c                  │   │
//!     └────┴───────────────────────────────────────┴───┘
//!       ▲                                          ▲
//!       stamp 3 (age 2)                            stamp 98 (age 7)
//!
//!   Same side of c     → numeric order is age order
//!   Opposite sides     → never "older than" (wrap guard)
//! ```
//!
//! ## Age
//!
//! ```text
//!   age(stamp) = current - stamp                          if current >= stamp
//!              = current + (max_generation - stamp)       otherwise (wrapped)
//! ```
//!
//! The ordering is safe as long as no stamp survives one full wraparound of
//! the clock relative to another. Every other module delegates here instead of
//! comparing stamps directly.
//!
//! ## Example Usage
//!
//! ```
//! use witherkit::builder::GenerationBuilder;
//!
//! let mut state = GenerationBuilder::new(100).life_span(10).starting_at(98).build();
//! state.advance_by(7);
//! assert_eq!(state.current(), 5);
//!
//! // 98 is numerically larger than 3 but lies on the other side of the clock
//! assert!(!state.is_older_than(Some(98), 3));
//! assert_eq!(state.age_of(98), 7);
//! ```

use tracing::warn;

use crate::error::ConfigError;

/// A generation stamp in `[0, max_generation)`.
pub type Generation = u32;

/// Modulus used when none is configured.
pub const DEFAULT_MAX_GENERATION: u32 = 1 << 20;

/// Clock and eviction parameters shared by every node of one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationState {
    current: Generation,
    max_generation: u32,
    life_span: Option<u32>,
    neighboring_links: bool,
}

impl GenerationState {
    /// Builds a state from parameters already checked by
    /// [`GenerationBuilder`](crate::builder::GenerationBuilder).
    pub(crate) fn from_validated(
        current: Generation,
        max_generation: u32,
        life_span: Option<u32>,
        neighboring_links: bool,
    ) -> Self {
        Self {
            current,
            max_generation,
            life_span: life_span.filter(|span| *span > 0),
            neighboring_links,
        }
    }

    /// Returns the current generation.
    #[inline]
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Returns the modulus at which the clock wraps.
    #[inline]
    pub fn max_generation(&self) -> u32 {
        self.max_generation
    }

    /// Returns the configured lifespan, `None` when eviction is disabled.
    #[inline]
    pub fn life_span(&self) -> Option<u32> {
        self.life_span
    }

    /// Returns `true` if nodes may be reached through lateral links.
    #[inline]
    pub fn neighboring_links(&self) -> bool {
        self.neighboring_links
    }

    /// Returns `true` if generation tracking is active.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.life_span.is_some()
    }

    /// Advances the clock by one tick, wrapping at `max_generation`.
    ///
    /// Returns the new current generation.
    #[inline]
    pub fn advance(&mut self) -> Generation {
        self.advance_by(1)
    }

    /// Advances the clock by `ticks`, wrapping at `max_generation`.
    pub fn advance_by(&mut self, ticks: u32) -> Generation {
        let next = (u64::from(self.current) + u64::from(ticks)) % u64::from(self.max_generation);
        self.current = next as Generation;
        self.current
    }

    /// Changes the lifespan. `None` or `Some(0)` disables eviction.
    pub fn set_life_span(&mut self, life_span: Option<u32>) -> Result<(), ConfigError> {
        if let Some(span) = life_span {
            if span >= self.max_generation {
                return Err(ConfigError::new(format!(
                    "life_span {} must be < max_generation {}",
                    span, self.max_generation
                )));
            }
        }
        if life_span == Some(0) {
            warn!("life_span of 0 disables generation tracking");
        }
        self.life_span = life_span.filter(|span| *span > 0);
        Ok(())
    }

    /// Enables or disables neighbouring-link skew repair.
    #[inline]
    pub fn set_neighboring_links(&mut self, enabled: bool) {
        self.neighboring_links = enabled;
    }

    /// Returns the stamp a freshly constructed node should carry.
    ///
    /// An explicit generation is reduced modulo `max_generation`; otherwise
    /// the current generation is used. Nodes built while tracking is inactive
    /// carry no stamp.
    pub fn initial_stamp(&self, explicit: Option<Generation>) -> Option<Generation> {
        if !self.is_tracking() {
            return None;
        }
        Some(explicit.map_or(self.current, |g| g % self.max_generation))
    }

    /// Returns `true` if `own` is older than `other`.
    ///
    /// Requires tracking to be active, `other > own`, and both stamps on the
    /// same side of the current generation. A missing `own` stamp is never
    /// older.
    pub fn is_older_than(&self, own: Option<Generation>, other: Generation) -> bool {
        if !self.is_tracking() {
            return false;
        }
        let Some(own) = own else {
            return false;
        };
        other > own && ((other <= self.current) == (own <= self.current))
    }

    /// Returns the number of generations elapsed since `stamp`.
    pub fn age_of(&self, stamp: Generation) -> u32 {
        if self.current >= stamp {
            self.current - stamp
        } else {
            self.current + self.max_generation.saturating_sub(stamp)
        }
    }

    /// Returns `true` if `stamp` has strictly exceeded the lifespan.
    ///
    /// Always `false` while tracking is inactive.
    #[inline]
    pub fn is_expired(&self, stamp: Generation) -> bool {
        self.life_span.is_some_and(|span| self.age_of(stamp) > span)
    }
}

impl Default for GenerationState {
    fn default() -> Self {
        Self::from_validated(0, DEFAULT_MAX_GENERATION, None, false)
    }
}
