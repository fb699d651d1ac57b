//! Access rejuvenation hooks.
//!
//! Refreshes a node's stamp whenever it takes part in a read traversal, an
//! uncached-range materialization, or a merge. Each entry point runs the
//! host's base behaviour first and refreshes the node afterwards.
//!
//! ```text
//!   traverse(node, range, config)          uncached_range(node, range, config)
//!        │                                        │
//!        ▼                                        ▼
//!   host.traverse_base(...)                 host.uncached_range_base(...)
//!        │   children routed back through         │   children routed back through
//!        │   traverse(...)                        │   uncached_range(...)
//!        ▼                                        ▼
//!   config.do_not_wither? ── yes ──► stamp untouched
//!        │ no
//!        ▼
//!   stamp = current
//! ```
//!
//! Merges keep the fresher of the two stamps, as decided by
//! [`GenerationState::is_older_than`].

use crate::ds::generation::GenerationState;
use crate::traits::{AccessConfig, GenerationStamped, MergeAfter, RangeTraversal, UncachedRanges};

/// Sets the node's stamp to the current generation when tracking is active.
#[inline]
pub fn rejuvenate<N: GenerationStamped + ?Sized>(node: &mut N, state: &GenerationState) {
    if state.is_tracking() {
        node.set_last_update_generation(state.current());
    }
}

#[inline]
fn after_access<N: GenerationStamped + ?Sized>(
    node: &mut N,
    state: &GenerationState,
    config: &AccessConfig,
) {
    if !config.do_not_wither {
        rejuvenate(node, state);
    }
}

/// Runs the host traversal over `range`, then refreshes `node`.
pub fn traverse<N: RangeTraversal>(
    node: &mut N,
    state: &GenerationState,
    range: &N::Range,
    config: &AccessConfig,
    visit: &mut dyn FnMut(&N::Range, &N::Value),
) {
    node.traverse_base(state, range, config, visit);
    after_access(node, state, config);
}

/// Computes the uncached parts of `range`, then refreshes `node`.
pub fn uncached_range<N: UncachedRanges>(
    node: &mut N,
    state: &GenerationState,
    range: &N::Range,
    config: &AccessConfig,
) -> Vec<N::Range> {
    let gaps = node.uncached_range_base(state, range, config);
    after_access(node, state, config);
    gaps
}

/// Merges `other` into `receiver`, keeping the more recent stamp.
pub fn merge_after<N: MergeAfter>(receiver: &mut N, other: N, state: &GenerationState) {
    let incoming = other.last_update_generation();
    receiver.merge_base(other);
    if let Some(incoming) = incoming {
        if state.is_older_than(receiver.last_update_generation(), incoming) {
            receiver.set_last_update_generation(incoming);
        }
    }
}
