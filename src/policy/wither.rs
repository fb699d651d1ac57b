//! Generation-based lazy eviction ("withering") for tree-shaped caches.
//!
//! Every node carries the generation at which it was last touched. A sweep
//! walks the tree depth-first and purges subtrees that have not been touched
//! for more than `life_span` generations, with age computed across clock
//! wraparound by [`GenerationState`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                          wither(node) per-node steps                        │
//! │                                                                             │
//! │   1. Skew repair (neighboring_links only)                                   │
//! │        for each slot with a stamp:                                          │
//! │          own older than slot stamp? → adopt slot stamp                      │
//! │                                                                             │
//! │   2. Self-eviction                                                          │
//! │        should_wither(node)? → clear(node), return true (children skipped)   │
//! │                                                                             │
//! │   3. Child sweep (index cursor)                                             │
//! │        ┌─────┬─────┬─────┐                                                  │
//! │   i=0  │ c0 ✗│ c1 ✗│ c2 ✓│   c0 withers → remove, re-examine i=0            │
//! │        ├─────┼─────┼─────┤                                                  │
//! │   i=0  │ c1 ✗│ c2 ✓│     │   c1 withers → remove, re-examine i=0            │
//! │        ├─────┼─────┘     │                                                  │
//! │   i=0  │ c2 ✓│               c2 survives → advance                          │
//! │        └─────┘                                                              │
//! │                                                                             │
//! │   4. Collapse signal                                                        │
//! │        child_num <= 1 && first slot is sentinel → return true               │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eligibility
//!
//! ```text
//!   should_wither(node):
//!     tracking off or no stamp          → false
//!     age(stamp) <= life_span           → false          (boundary exclusive)
//!     first child exists and is young   → false          (protection)
//!     otherwise                         → true
//! ```
//!
//! Protection looks only at the first slot. Data values and the sentinel do
//! not protect; only a witherable child whose own `should_wither` is `false`
//! does.
//!
//! ## Example Usage
//!
//! ```
//! use witherkit::builder::GenerationBuilder;
//! use witherkit::policy::wither::{should_wither, wither};
//! use witherkit::tree::CacheNode;
//!
//! let state = GenerationBuilder::new(100).life_span(10).starting_at(20).build();
//!
//! let mut root = CacheNode::with_generation(0..100, &state, 20)
//!     .with_child(CacheNode::with_generation(0..50, &state, 5).with_value(0..50, "stale"))
//!     .with_child(CacheNode::with_generation(50..100, &state, 18).with_value(50..100, "fresh"));
//!
//! assert!(!should_wither(&root, &state));
//! assert!(!wither(&mut root, &state));
//! assert_eq!(root.slots().len(), 1);
//! ```
//!
//! ## Failure Semantics
//!
//! Nothing here fails. Slots without a witherable child are skipped, a node
//! without a stamp is never eligible, and a disabled lifespan turns the sweep
//! into a purely structural pass that only reports already-empty nodes.

use tracing::{debug, trace};

use crate::ds::generation::GenerationState;
use crate::traits::WitherNode;

/// Counters collected during one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Nodes whose sweep step ran.
    pub nodes_visited: u64,
    /// Stamps adopted from children during skew repair.
    pub skew_repairs: u64,
    /// Nodes cleared because they exceeded their lifespan.
    pub self_evictions: u64,
    /// Children removed from their parent after reporting withered.
    pub children_detached: u64,
    /// Nodes that were too old but kept alive by a young first child.
    pub protected_nodes: u64,
    /// Whether the swept root reported itself empty.
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    Untracked,
    Young,
    Protected,
    Eligible,
}

fn eligibility<N: WitherNode>(node: &N, state: &GenerationState) -> Eligibility {
    if !state.is_tracking() {
        return Eligibility::Untracked;
    }
    let Some(stamp) = node.last_update_generation() else {
        return Eligibility::Untracked;
    };
    if !state.is_expired(stamp) {
        return Eligibility::Young;
    }
    match node.first_child() {
        Some(first) if !should_wither(first, state) => Eligibility::Protected,
        _ => Eligibility::Eligible,
    }
}

/// Returns `true` if `node` qualifies for withering.
///
/// Read-only. A node is eligible when its age strictly exceeds the lifespan
/// and its first child, if it has one, is itself eligible.
#[inline]
pub fn should_wither<N: WitherNode>(node: &N, state: &GenerationState) -> bool {
    eligibility(node, state) == Eligibility::Eligible
}

/// Sweeps the subtree rooted at `node`.
///
/// Returns `true` if the node has become empty and its caller should detach
/// it.
pub fn wither<N: WitherNode>(node: &mut N, state: &GenerationState) -> bool {
    let mut report = SweepReport::default();
    wither_with_report(node, state, &mut report)
}

/// Sweeps the subtree rooted at `node`, accumulating counters into `report`.
///
/// `report.collapsed` is left untouched; see [`sweep`].
pub fn wither_with_report<N: WitherNode>(
    node: &mut N,
    state: &GenerationState,
    report: &mut SweepReport,
) -> bool {
    report.nodes_visited += 1;

    if state.neighboring_links() && state.is_tracking() {
        repair_skew(node, state, report);
    }

    match eligibility(node, state) {
        Eligibility::Eligible => {
            trace!(
                stamp = ?node.last_update_generation(),
                current = state.current(),
                "node withered"
            );
            node.clear();
            report.self_evictions += 1;
            return true;
        },
        Eligibility::Protected => report.protected_nodes += 1,
        Eligibility::Untracked | Eligibility::Young => {},
    }

    let mut index = 0;
    while index < node.child_num() {
        let withered = match node.child_mut(index) {
            Some(child) => wither_with_report(child, state, report),
            None => false,
        };
        if withered {
            // The next sibling shifts into `index`; examine it before moving on.
            node.remove_child(index);
            report.children_detached += 1;
            trace!(index, "detached withered child");
        } else {
            index += 1;
        }
    }

    node.child_num() <= 1 && node.first_slot_is_sentinel()
}

/// Runs a full sweep from `root` and returns its report.
pub fn sweep<N: WitherNode>(root: &mut N, state: &GenerationState) -> SweepReport {
    debug!(
        current = state.current(),
        life_span = ?state.life_span(),
        neighboring_links = state.neighboring_links(),
        "wither sweep started"
    );
    let mut report = SweepReport::default();
    report.collapsed = wither_with_report(root, state, &mut report);
    debug!(
        visited = report.nodes_visited,
        evicted = report.self_evictions,
        detached = report.children_detached,
        protected = report.protected_nodes,
        skew_repairs = report.skew_repairs,
        collapsed = report.collapsed,
        "wither sweep finished"
    );
    report
}

/// Adopts fresher stamps from direct slots that were reached without going
/// through this node.
fn repair_skew<N: WitherNode>(node: &mut N, state: &GenerationState, report: &mut SweepReport) {
    for index in 0..node.child_num() {
        let Some(stamp) = node.slot_stamp(index) else {
            continue;
        };
        if state.is_older_than(node.last_update_generation(), stamp) {
            trace!(
                from = ?node.last_update_generation(),
                to = stamp,
                "repaired generation skew"
            );
            node.set_last_update_generation(stamp);
            report.skew_repairs += 1;
        }
    }
}
