//! # Metrics Traits
//!
//! Separates *recording* from *snapshotting*, so counters stay out of the
//! policy code paths and tests or benches read them through a snapshot.
//!
//! ```text
//!   ┌─────────────────────────────┐        ┌──────────────────────────────┐
//!   │   WitherMetricsRecorder     │        │ MetricsSnapshotProvider<S>   │
//!   │  record_sweep(report)       │        │  snapshot() → S              │
//!   │  record_access(inspect)     │        ├──────────────────────────────┤
//!   │  record_merge()             │        │ MetricsReset                 │
//!   └─────────────────────────────┘        │  reset_metrics()             │
//!              ▲                           └──────────────────────────────┘
//!              │ implemented by                        ▲
//!        WitherMetrics                        GenerationTree<N>
//! ```

use crate::policy::wither::SweepReport;

/// Counters for generation-based eviction.
pub trait WitherMetricsRecorder {
    /// Folds one sweep's report into the totals.
    fn record_sweep(&mut self, report: &SweepReport);
    /// Records a read entry point; `inspect` is `true` for `do_not_wither` calls.
    fn record_access(&mut self, inspect: bool);
    fn record_merge(&mut self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}
