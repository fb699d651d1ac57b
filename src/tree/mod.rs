//! Tree owner that ties a root node to its generation clock.
//!
//! [`GenerationTree`] owns the root and the [`GenerationState`], advances the
//! clock, runs sweeps, and routes read traversals through the rejuvenation
//! hooks. Any node type implementing the capability traits can be the root;
//! [`CacheNode`] is the reference interval host.
//!
//! ## Example Usage
//!
//! ```
//! use witherkit::builder::GenerationBuilder;
//! use witherkit::traits::AccessConfig;
//! use witherkit::tree::{CacheNode, GenerationTree};
//!
//! let state = GenerationBuilder::new(1_000).life_span(2).build();
//! let root = CacheNode::new(0..20, &state)
//!     .with_child(CacheNode::new(0..10, &state).with_value(0..10, "hot"))
//!     .with_child(CacheNode::new(10..20, &state).with_value(10..20, "cold"));
//! let mut tree = GenerationTree::new(root, state);
//!
//! for _ in 0..3 {
//!     tree.advance_generation();
//!     tree.traverse(&(0..10), AccessConfig::default(), |_, _| {});
//! }
//!
//! let report = tree.wither();
//! assert_eq!(report.children_detached, 1);
//! assert_eq!(tree.uncached_range(&(0..20), AccessConfig::INSPECT), vec![10..20]);
//! ```

mod node;

pub use node::{CacheNode, Slot};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::WitherMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::WitherMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider, WitherMetricsRecorder};

use crate::ds::generation::{Generation, GenerationState};
use crate::policy::rejuvenate;
use crate::policy::wither::{self, SweepReport};
use crate::traits::{AccessConfig, MergeAfter, RangeTraversal, UncachedRanges, WitherNode};

/// A root node together with the clock every node in it shares.
#[derive(Debug)]
pub struct GenerationTree<N> {
    root: N,
    state: GenerationState,
    #[cfg(feature = "metrics")]
    metrics: WitherMetrics,
}

impl<N> GenerationTree<N> {
    /// Wraps `root` with the given clock state.
    pub fn new(root: N, state: GenerationState) -> Self {
        Self {
            root,
            state,
            #[cfg(feature = "metrics")]
            metrics: WitherMetrics::default(),
        }
    }

    /// Returns the clock state.
    #[inline]
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Returns the clock state for reconfiguration.
    #[inline]
    pub fn state_mut(&mut self) -> &mut GenerationState {
        &mut self.state
    }

    #[inline]
    pub fn root(&self) -> &N {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut N {
        &mut self.root
    }

    pub fn into_root(self) -> N {
        self.root
    }

    /// Advances the clock by one tick and returns the new generation.
    #[inline]
    pub fn advance_generation(&mut self) -> Generation {
        self.state.advance()
    }
}

impl<N: WitherNode> GenerationTree<N> {
    /// Runs a withering sweep from the root.
    ///
    /// The root itself is never detached; when it withers or collapses it is
    /// left holding the sentinel and `report.collapsed` is set.
    pub fn wither(&mut self) -> SweepReport {
        let report = wither::sweep(&mut self.root, &self.state);
        #[cfg(feature = "metrics")]
        self.metrics.record_sweep(&report);
        report
    }

    /// Returns `true` if the root would wither on the next sweep.
    #[inline]
    pub fn should_wither(&self) -> bool {
        wither::should_wither(&self.root, &self.state)
    }
}

impl<N: RangeTraversal> GenerationTree<N> {
    /// Visits values overlapping `range`, refreshing every visited node
    /// unless `config.do_not_wither` is set.
    pub fn traverse(
        &mut self,
        range: &N::Range,
        config: AccessConfig,
        mut visit: impl FnMut(&N::Range, &N::Value),
    ) {
        #[cfg(feature = "metrics")]
        self.metrics.record_access(config.do_not_wither);
        rejuvenate::traverse(&mut self.root, &self.state, range, &config, &mut visit);
    }
}

impl<N: UncachedRanges> GenerationTree<N> {
    /// Returns the parts of `range` not held by the tree, refreshing every
    /// visited node unless `config.do_not_wither` is set.
    pub fn uncached_range(&mut self, range: &N::Range, config: AccessConfig) -> Vec<N::Range> {
        #[cfg(feature = "metrics")]
        self.metrics.record_access(config.do_not_wither);
        rejuvenate::uncached_range(&mut self.root, &self.state, range, &config)
    }
}

impl<N: MergeAfter> GenerationTree<N> {
    /// Merges `other` into the root, keeping the fresher stamp.
    pub fn merge_into_root(&mut self, other: N) {
        #[cfg(feature = "metrics")]
        self.metrics.record_merge();
        rejuvenate::merge_after(&mut self.root, other, &self.state);
    }
}

#[cfg(feature = "metrics")]
impl<N> GenerationTree<N> {
    /// Returns a snapshot of cumulative sweep metrics.
    pub fn metrics_snapshot(&self) -> WitherMetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<N> MetricsSnapshotProvider<WitherMetricsSnapshot> for GenerationTree<N> {
    fn snapshot(&self) -> WitherMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<N> MetricsReset for GenerationTree<N> {
    fn reset_metrics(&mut self) {
        self.metrics = WitherMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GenerationBuilder;
    use crate::traits::GenerationStamped;

    fn sample_tree(life_span: u32) -> GenerationTree<CacheNode<&'static str>> {
        let state = GenerationBuilder::new(64).life_span(life_span).build();
        let root = CacheNode::new(0..30, &state)
            .with_child(CacheNode::new(0..10, &state).with_value(0..10, "a"))
            .with_child(CacheNode::new(10..20, &state).with_value(10..20, "b"))
            .with_child(CacheNode::new(20..30, &state).with_value(20..30, "c"));
        GenerationTree::new(root, state)
    }

    #[test]
    fn test_traverse_refreshes_path_only() {
        let mut tree = sample_tree(4);
        tree.advance_generation();
        tree.traverse(&(12..14), AccessConfig::default(), |_, _| {});

        let root = tree.root();
        assert_eq!(root.last_update_generation(), Some(1));
        assert_eq!(root.child(0).and_then(|c| c.last_update_generation()), Some(0));
        assert_eq!(root.child(1).and_then(|c| c.last_update_generation()), Some(1));
        assert!(root.check_invariants(tree.state()).is_ok());
    }

    #[test]
    fn test_inspect_traversal_leaves_stamps() {
        let mut tree = sample_tree(4);
        tree.advance_generation();
        let mut seen = Vec::new();
        tree.traverse(&(0..30), AccessConfig::INSPECT, |r, v| seen.push((r.start, *v)));
        assert_eq!(seen, vec![(0, "a"), (10, "b"), (20, "c")]);
        assert_eq!(tree.root().last_update_generation(), Some(0));
    }

    #[test]
    fn test_sweep_evicts_untouched_branches() {
        let mut tree = sample_tree(2);
        for _ in 0..3 {
            tree.advance_generation();
            tree.traverse(&(0..5), AccessConfig::default(), |_, _| {});
        }
        let report = tree.wither();
        assert_eq!(report.children_detached, 2);
        assert!(!report.collapsed);
        assert_eq!(tree.root().value_count(), 1);
        assert_eq!(tree.uncached_range(&(0..30), AccessConfig::INSPECT), vec![10..30]);
    }

    #[test]
    fn test_untouched_tree_collapses_root() {
        let mut tree = sample_tree(2);
        for _ in 0..3 {
            tree.advance_generation();
        }
        assert!(tree.should_wither());
        let report = tree.wither();
        assert!(report.collapsed);
        assert_eq!(report.self_evictions, 1);
        assert!(tree.root().is_empty());
    }

    #[test]
    fn test_merge_into_root_keeps_fresh_stamp() {
        let mut tree = sample_tree(8);
        tree.state_mut().advance_by(5);
        let state = *tree.state();
        let extra = CacheNode::new(30..40, &state).with_value(30..40, "d");
        tree.merge_into_root(extra);
        assert_eq!(tree.root().last_update_generation(), Some(5));
        assert_eq!(tree.root().range(), &(0..40));
    }

    #[test]
    fn test_root_mut_edits_survive_into_root() {
        let mut tree = sample_tree(4);
        tree.state_mut().advance_by(3);
        tree.root_mut().set_last_update_generation(3);

        let root = tree.into_root();
        assert_eq!(root.value_count(), 3);
        assert_eq!(root.last_update_generation(), Some(3));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_metrics_accumulate_across_sweeps() {
        let mut tree = sample_tree(2);
        for _ in 0..3 {
            tree.advance_generation();
            tree.traverse(&(0..5), AccessConfig::default(), |_, _| {});
        }
        tree.uncached_range(&(0..30), AccessConfig::INSPECT);
        tree.wither();
        tree.wither();

        let snapshot = tree.metrics_snapshot();
        assert_eq!(snapshot.sweeps, 2);
        assert_eq!(snapshot.children_detached, 2);
        assert_eq!(snapshot.tracked_accesses, 3);
        assert_eq!(snapshot.inspect_accesses, 1);

        tree.reset_metrics();
        assert_eq!(tree.metrics_snapshot().sweeps, 0);
    }
}
