//! # Capability Traits
//!
//! This module defines the seams between the eviction core and a host tree.
//! The host owns storage, ordering and the structural primitives; the core
//! owns generation stamps, the eligibility rule and the sweep. A node takes
//! part in generation-based eviction by implementing a small set of
//! capabilities, and gains the policy operations through blanket impls.
//!
//! ## Architecture
//!
//! ```text
//!                          ┌─────────────────────────────────────────┐
//!                          │          GenerationStamped              │
//!                          │                                         │
//!                          │  last_update_generation(&) → Option<G>  │
//!                          │  set_last_update_generation(&mut, G)    │
//!                          └──────────────────┬──────────────────────┘
//!                                             │
//!        ┌────────────────────────────┬───────┴────────────┬──────────────────────────┐
//!        │                            │                    │                          │
//!        ▼                            ▼                    ▼                          ▼
//!   ┌──────────────────────┐  ┌────────────────────┐  ┌────────────────────┐  ┌────────────────────┐
//!   │  WitherNode (host)   │  │ RangeTraversal     │  │ UncachedRanges     │  │ MergeAfter         │
//!   │                      │  │  traverse_base     │  │ uncached_range_base│  │  merge_base        │
//!   │  child_num           │  └────────────────────┘  └────────────────────┘  └────────────────────┘
//!   │  slot_stamp(i)       │            optional host capabilities, wrapped by
//!   │  child / child_mut   │            policy::rejuvenate entry points
//!   │  first_slot_is_      │
//!   │    sentinel          │
//!   │  clear / remove_child│
//!   └──────────┬───────────┘
//!              │ blanket impls
//!              ▼
//!   ┌──────────────────────┐  ┌──────────────────────┐
//!   │  Witherable          │  │  Rejuvenatable       │
//!   │   should_wither      │  │   rejuvenate         │
//!   │   wither             │  │  (any stamped node)  │
//!   └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! ## Optional capabilities
//!
//! A host that cannot traverse ranges simply does not implement
//! [`RangeTraversal`]; the tracked entry points then do not exist for it.
//! Inside a node, a slot that is not a witherable child returns `None` from
//! [`WitherNode::child`] and is left untouched by the sweep.
//!
//! ## Thread Safety
//!
//! None of these traits require `Send` or `Sync`. Sweeps take `&mut` on the
//! root, which gives the exclusive access the policy assumes.

use crate::ds::generation::{Generation, GenerationState};
use crate::policy::{rejuvenate, wither};

/// A node that records the generation of its most recent access.
pub trait GenerationStamped {
    /// Returns the stamp, or `None` if the node predates generation tracking.
    fn last_update_generation(&self) -> Option<Generation>;

    /// Overwrites the stamp.
    fn set_last_update_generation(&mut self, generation: Generation);
}

/// Structural primitives a host node exposes to the sweep.
///
/// Slots are addressed by index in `[0, child_num())`. A slot may hold a
/// child node of the same type, plain data, or the empty sentinel.
pub trait WitherNode: GenerationStamped + Sized {
    /// Number of occupied child slots.
    fn child_num(&self) -> usize;

    /// Stamp exposed by the slot at `index`, if the slot carries one.
    fn slot_stamp(&self, index: usize) -> Option<Generation>;

    /// Child node at `index`, if that slot holds one.
    fn child(&self, index: usize) -> Option<&Self>;

    /// Mutable child node at `index`, if that slot holds one.
    fn child_mut(&mut self, index: usize) -> Option<&mut Self>;

    /// Child node in the first slot.
    fn first_child(&self) -> Option<&Self> {
        self.child(0)
    }

    /// Returns `true` if the first slot holds the empty sentinel.
    fn first_slot_is_sentinel(&self) -> bool;

    /// Replaces all content with a single empty sentinel slot.
    fn clear(&mut self);

    /// Detaches the child at `index` without preserving it for a later merge.
    ///
    /// Subsequent slots shift left by one. Removing the last remaining slot
    /// leaves the empty sentinel behind.
    fn remove_child(&mut self, index: usize);
}

/// Generation-based eviction operations.
pub trait Witherable {
    /// Returns `true` if the node qualifies for withering. Read-only.
    fn should_wither(&self, state: &GenerationState) -> bool;

    /// Sweeps the subtree; returns `true` if the caller should detach it.
    fn wither(&mut self, state: &GenerationState) -> bool;
}

/// Refreshes a node's stamp to the current generation.
pub trait Rejuvenatable {
    fn rejuvenate(&mut self, state: &GenerationState);
}

impl<N: WitherNode> Witherable for N {
    #[inline]
    fn should_wither(&self, state: &GenerationState) -> bool {
        wither::should_wither(self, state)
    }

    #[inline]
    fn wither(&mut self, state: &GenerationState) -> bool {
        wither::wither(self, state)
    }
}

impl<N: GenerationStamped> Rejuvenatable for N {
    #[inline]
    fn rejuvenate(&mut self, state: &GenerationState) {
        rejuvenate::rejuvenate(self, state)
    }
}

/// Per-call options for read traversals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessConfig {
    /// Skip rejuvenation; used by maintenance calls that only inspect nodes.
    pub do_not_wither: bool,
}

impl AccessConfig {
    /// Options for a maintenance pass that must not extend lifespans.
    pub const INSPECT: Self = Self {
        do_not_wither: true,
    };
}

/// Host-provided range traversal.
///
/// Implementations visit matching values held directly by the node and
/// descend into children through [`policy::rejuvenate::traverse`](crate::policy::rejuvenate::traverse)
/// so every visited node is refreshed.
pub trait RangeTraversal: GenerationStamped {
    type Range;
    type Value;

    fn traverse_base(
        &mut self,
        state: &GenerationState,
        range: &Self::Range,
        config: &AccessConfig,
        visit: &mut dyn FnMut(&Self::Range, &Self::Value),
    );
}

/// Host-provided computation of the parts of a range not yet cached.
///
/// Implementations descend into children through
/// [`policy::rejuvenate::uncached_range`](crate::policy::rejuvenate::uncached_range).
pub trait UncachedRanges: GenerationStamped {
    type Range;

    fn uncached_range_base(
        &mut self,
        state: &GenerationState,
        range: &Self::Range,
        config: &AccessConfig,
    ) -> Vec<Self::Range>;
}

/// Host-provided merge of another node's content into this one.
pub trait MergeAfter: GenerationStamped + Sized {
    fn merge_base(&mut self, other: Self);
}
