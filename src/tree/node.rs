//! Reference interval node for generation-tracked cache trees.
//!
//! A [`CacheNode`] covers a half-open `u64` interval and holds an ordered
//! sequence of slots. Each slot is either a cached value over a sub-interval,
//! a child node, or the empty sentinel a cleared node is left with.
//!
//! ## Layout
//!
//! ```text
//!   CacheNode { range: 0..100, stamp: Some(42) }
//!   ┌─────────────────┬──────────────────────────┬─────────────────┐
//!   │ Value 0..20 "a" │ Child 20..60 ─► CacheNode │ Value 70..100   │
//!   └─────────────────┴──────────────────────────┴─────────────────┘
//!                                                 ▲
//!                               60..70 not cached │ (reported by uncached_range)
//!
//!   Cleared node:
//!   ┌───────┐
//!   │ Empty │   child_num() == 1, first_slot_is_sentinel() == true
//!   └───────┘
//! ```
//!
//! Slots are expected in ascending, non-overlapping order inside the node's
//! interval; [`CacheNode::check_invariants`] verifies this along with the
//! generation invariants. The node implements every host capability the
//! eviction core consumes: [`WitherNode`], [`RangeTraversal`],
//! [`UncachedRanges`] and [`MergeAfter`].

use std::ops::Range;

use crate::ds::generation::{Generation, GenerationState};
use crate::error::InvariantError;
use crate::policy::rejuvenate;
use crate::traits::{
    AccessConfig, GenerationStamped, MergeAfter, RangeTraversal, UncachedRanges, WitherNode,
};

/// One position in a node's ordered content.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<V> {
    /// Sentinel left behind when a node is cleared.
    Empty,
    /// Cached value covering `range`.
    Value { range: Range<u64>, value: V },
    /// Nested node.
    Child(Box<CacheNode<V>>),
}

impl<V> Slot<V> {
    /// Interval covered by the slot; `None` for the sentinel.
    pub fn range(&self) -> Option<&Range<u64>> {
        match self {
            Slot::Empty => None,
            Slot::Value { range, .. } => Some(range),
            Slot::Child(child) => Some(&child.range),
        }
    }

    #[inline]
    fn overlaps(&self, query: &Range<u64>) -> bool {
        self.range()
            .is_some_and(|r| r.start < query.end && query.start < r.end)
    }
}

/// Interval node of a generation-tracked cache tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheNode<V> {
    range: Range<u64>,
    slots: Vec<Slot<V>>,
    last_update_generation: Option<Generation>,
}

impl<V> CacheNode<V> {
    /// Creates an empty node stamped with the current generation.
    ///
    /// The node carries no stamp while tracking is inactive.
    pub fn new(range: Range<u64>, state: &GenerationState) -> Self {
        Self {
            range,
            slots: vec![Slot::Empty],
            last_update_generation: state.initial_stamp(None),
        }
    }

    /// Creates an empty node stamped with an explicit generation.
    pub fn with_generation(
        range: Range<u64>,
        state: &GenerationState,
        generation: Generation,
    ) -> Self {
        Self {
            range,
            slots: vec![Slot::Empty],
            last_update_generation: state.initial_stamp(Some(generation)),
        }
    }

    /// Creates an empty node that predates generation tracking.
    pub fn unstamped(range: Range<u64>) -> Self {
        Self {
            range,
            slots: vec![Slot::Empty],
            last_update_generation: None,
        }
    }

    /// Appends a value slot, builder style.
    pub fn with_value(mut self, range: Range<u64>, value: V) -> Self {
        self.push_value(range, value);
        self
    }

    /// Appends a child slot, builder style.
    pub fn with_child(mut self, child: CacheNode<V>) -> Self {
        self.push_child(child);
        self
    }

    /// Appends a value slot, replacing the sentinel if the node was empty.
    pub fn push_value(&mut self, range: Range<u64>, value: V) {
        self.push_slot(Slot::Value { range, value });
    }

    /// Appends a child slot, replacing the sentinel if the node was empty.
    pub fn push_child(&mut self, child: CacheNode<V>) {
        self.push_slot(Slot::Child(Box::new(child)));
    }

    fn push_slot(&mut self, slot: Slot<V>) {
        if self.is_empty() {
            self.slots.clear();
        }
        self.slots.push(slot);
    }

    /// Interval the node covers.
    #[inline]
    pub fn range(&self) -> &Range<u64> {
        &self.range
    }

    /// Ordered slots held by the node.
    #[inline]
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Returns `true` if the node holds only the sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.slots.as_slice(), [] | [Slot::Empty])
    }

    /// Number of values in the whole subtree.
    pub fn value_count(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Empty => 0,
                Slot::Value { .. } => 1,
                Slot::Child(child) => child.value_count(),
            })
            .sum()
    }

    /// Number of nodes in the subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Child(child) => child.node_count(),
                _ => 0,
            })
            .sum::<usize>()
    }

    /// Validates structural and generation invariants for the subtree.
    ///
    /// Checks that slots are ordered, non-overlapping and inside the node's
    /// interval, that the sentinel only appears alone, that stamps are below
    /// `max_generation`, and (unless neighbouring links are enabled) that no
    /// parent is older than one of its children.
    pub fn check_invariants(&self, state: &GenerationState) -> Result<(), InvariantError> {
        if self.slots.is_empty() {
            return Err(InvariantError::new(format!(
                "node {:?} has no slots",
                self.range
            )));
        }
        if let Some(stamp) = self.last_update_generation {
            if stamp >= state.max_generation() {
                return Err(InvariantError::new(format!(
                    "node {:?} stamp {} >= max_generation {}",
                    self.range,
                    stamp,
                    state.max_generation()
                )));
            }
        }

        let mut cursor = self.range.start;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(range) = slot.range() else {
                if self.slots.len() > 1 {
                    return Err(InvariantError::new(format!(
                        "node {:?} holds a sentinel at {} beside other slots",
                        self.range, index
                    )));
                }
                continue;
            };
            if range.start < cursor || range.end > self.range.end || range.start > range.end {
                return Err(InvariantError::new(format!(
                    "node {:?} slot {} range {:?} out of order or bounds",
                    self.range, index, range
                )));
            }
            cursor = range.end;

            if let Slot::Child(child) = slot {
                if !state.neighboring_links() {
                    if let Some(child_stamp) = child.last_update_generation {
                        if state.is_older_than(self.last_update_generation, child_stamp) {
                            return Err(InvariantError::new(format!(
                                "node {:?} stamp {:?} older than child {:?} stamp {}",
                                self.range, self.last_update_generation, child.range, child_stamp
                            )));
                        }
                    }
                }
                child.check_invariants(state)?;
            }
        }
        Ok(())
    }
}

impl<V> GenerationStamped for CacheNode<V> {
    #[inline]
    fn last_update_generation(&self) -> Option<Generation> {
        self.last_update_generation
    }

    #[inline]
    fn set_last_update_generation(&mut self, generation: Generation) {
        self.last_update_generation = Some(generation);
    }
}

impl<V> WitherNode for CacheNode<V> {
    #[inline]
    fn child_num(&self) -> usize {
        self.slots.len()
    }

    fn slot_stamp(&self, index: usize) -> Option<Generation> {
        match self.slots.get(index)? {
            Slot::Child(child) => child.last_update_generation,
            _ => None,
        }
    }

    fn child(&self, index: usize) -> Option<&Self> {
        match self.slots.get(index)? {
            Slot::Child(child) => Some(child.as_ref()),
            _ => None,
        }
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        match self.slots.get_mut(index)? {
            Slot::Child(child) => Some(child.as_mut()),
            _ => None,
        }
    }

    #[inline]
    fn first_slot_is_sentinel(&self) -> bool {
        matches!(self.slots.first(), Some(Slot::Empty))
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.slots.push(Slot::Empty);
    }

    fn remove_child(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
        }
        if self.slots.is_empty() {
            self.slots.push(Slot::Empty);
        }
    }
}

impl<V> RangeTraversal for CacheNode<V> {
    type Range = Range<u64>;
    type Value = V;

    fn traverse_base(
        &mut self,
        state: &GenerationState,
        range: &Range<u64>,
        config: &AccessConfig,
        visit: &mut dyn FnMut(&Range<u64>, &V),
    ) {
        for slot in &mut self.slots {
            if !slot.overlaps(range) {
                continue;
            }
            match slot {
                Slot::Value { range: r, value } => visit(&*r, &*value),
                Slot::Child(child) => {
                    rejuvenate::traverse(child.as_mut(), state, range, config, visit)
                },
                Slot::Empty => {},
            }
        }
    }
}

impl<V> UncachedRanges for CacheNode<V> {
    type Range = Range<u64>;

    fn uncached_range_base(
        &mut self,
        state: &GenerationState,
        range: &Range<u64>,
        config: &AccessConfig,
    ) -> Vec<Range<u64>> {
        let mut gaps = Vec::new();
        if range.start >= range.end {
            return gaps;
        }

        let mut cursor = range.start;
        for slot in &mut self.slots {
            if !slot.overlaps(range) {
                continue;
            }
            match slot {
                Slot::Value { range: r, .. } => {
                    push_gap(&mut gaps, cursor..r.start);
                    cursor = cursor.max(r.end);
                },
                Slot::Child(child) => {
                    let child_range = child.range.clone();
                    push_gap(&mut gaps, cursor..child_range.start);
                    let query = cursor.max(child_range.start)..range.end.min(child_range.end);
                    for gap in rejuvenate::uncached_range(child.as_mut(), state, &query, config) {
                        push_gap(&mut gaps, gap);
                    }
                    cursor = cursor.max(child_range.end);
                },
                Slot::Empty => {},
            }
        }
        push_gap(&mut gaps, cursor..range.end);
        gaps
    }
}

/// Appends a non-empty gap, coalescing it with an adjacent predecessor.
fn push_gap(gaps: &mut Vec<Range<u64>>, gap: Range<u64>) {
    if gap.start >= gap.end {
        return;
    }
    match gaps.last_mut() {
        Some(last) if last.end >= gap.start => last.end = last.end.max(gap.end),
        _ => gaps.push(gap),
    }
}

impl<V> MergeAfter for CacheNode<V> {
    fn merge_base(&mut self, other: Self) {
        self.range.end = self.range.end.max(other.range.end);
        for slot in other.slots {
            if !matches!(slot, Slot::Empty) {
                self.push_slot(slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GenerationBuilder;

    fn state() -> GenerationState {
        GenerationBuilder::new(100).life_span(10).starting_at(40).build()
    }

    #[test]
    fn test_new_node_is_sentinel_only() {
        let s = state();
        let node: CacheNode<u8> = CacheNode::new(0..10, &s);
        assert!(node.is_empty());
        assert_eq!(node.child_num(), 1);
        assert!(node.first_slot_is_sentinel());
        assert_eq!(node.last_update_generation(), Some(40));
    }

    #[test]
    fn test_push_replaces_sentinel() {
        let s = state();
        let node = CacheNode::new(0..10, &s).with_value(0..5, 1u8);
        assert_eq!(node.child_num(), 1);
        assert!(!node.first_slot_is_sentinel());
    }

    #[test]
    fn test_remove_last_child_leaves_sentinel() {
        let s = state();
        let mut node: CacheNode<u8> = CacheNode::new(0..10, &s).with_child(CacheNode::new(0..10, &s));
        node.remove_child(0);
        assert!(node.first_slot_is_sentinel());
        assert_eq!(node.child_num(), 1);
    }

    #[test]
    fn test_remove_shifts_following_slots() {
        let s = state();
        let mut node = CacheNode::new(0..30, &s)
            .with_child(CacheNode::new(0..10, &s))
            .with_child(CacheNode::new(10..20, &s))
            .with_value(20..30, 3u8);
        node.remove_child(0);
        assert_eq!(node.child_num(), 2);
        assert_eq!(node.child(0).map(|c| c.range().clone()), Some(10..20));
        assert!(node.child(1).is_none());
    }

    #[test]
    fn test_slot_stamp_only_for_children() {
        let s = state();
        let node = CacheNode::new(0..20, &s)
            .with_value(0..10, 1u8)
            .with_child(CacheNode::with_generation(10..20, &s, 33));
        assert_eq!(node.slot_stamp(0), None);
        assert_eq!(node.slot_stamp(1), Some(33));
        assert_eq!(node.slot_stamp(9), None);
    }

    #[test]
    fn test_traverse_visits_overlapping_values_in_order() {
        let s = state();
        let mut node = CacheNode::new(0..40, &s)
            .with_value(0..10, 'a')
            .with_child(
                CacheNode::new(10..30, &s)
                    .with_value(10..20, 'b')
                    .with_value(20..30, 'c'),
            )
            .with_value(30..40, 'd');

        let mut seen = Vec::new();
        node.traverse_base(
            &s,
            &(15..35),
            &AccessConfig::default(),
            &mut |_: &Range<u64>, v: &char| seen.push(*v),
        );
        assert_eq!(seen, vec!['b', 'c', 'd']);
    }

    #[test]
    fn test_uncached_gaps_across_children() {
        let s = state();
        let mut node = CacheNode::new(0..100, &s)
            .with_value(0..20, 1u8)
            .with_child(CacheNode::new(20..60, &s).with_value(30..40, 2u8))
            .with_value(70..100, 3u8);

        let gaps = node.uncached_range_base(&s, &(0..100), &AccessConfig::default());
        assert_eq!(gaps, vec![20..30, 40..70]);

        let gaps = node.uncached_range_base(&s, &(35..120), &AccessConfig::default());
        assert_eq!(gaps, vec![40..70, 100..120]);

        assert!(node.uncached_range_base(&s, &(5..5), &AccessConfig::default()).is_empty());
    }

    #[test]
    fn test_merge_base_appends_and_extends() {
        let s = state();
        let mut left = CacheNode::new(0..10, &s);
        let right = CacheNode::new(10..20, &s).with_value(10..20, 9u8);
        left.merge_base(right);
        assert_eq!(left.range(), &(0..20));
        assert_eq!(left.value_count(), 1);
        assert!(!left.is_empty());
    }

    #[test]
    fn test_check_invariants_accepts_well_formed_tree() {
        let s = state();
        let node = CacheNode::with_generation(0..20, &s, 40)
            .with_child(CacheNode::with_generation(0..10, &s, 38).with_value(0..10, 1u8))
            .with_value(10..20, 2u8);
        assert!(node.check_invariants(&s).is_ok());
        assert_eq!(node.node_count(), 2);
    }

    #[test]
    fn test_check_invariants_rejects_stale_parent() {
        let s = state();
        let node = CacheNode::with_generation(0..20, &s, 30)
            .with_child(CacheNode::with_generation(0..10, &s, 38).with_value(0..10, 1u8));
        let err = node.check_invariants(&s).unwrap_err();
        assert!(err.message().contains("older than child"));
    }

    #[test]
    fn test_check_invariants_rejects_overlapping_slots() {
        let s = state();
        let node = CacheNode::new(0..20, &s)
            .with_value(0..10, 1u8)
            .with_value(5..15, 2u8);
        assert!(node.check_invariants(&s).is_err());
    }
}
