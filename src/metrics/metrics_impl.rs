use crate::metrics::snapshot::WitherMetricsSnapshot;
use crate::metrics::traits::{MetricsSnapshotProvider, WitherMetricsRecorder};
use crate::policy::wither::SweepReport;

// ---------------------------------------------------------------------------
// WitherMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct WitherMetrics {
    pub sweeps: u64,
    pub root_collapses: u64,
    pub nodes_visited: u64,
    pub skew_repairs: u64,
    pub self_evictions: u64,
    pub children_detached: u64,
    pub protected_nodes: u64,
    pub tracked_accesses: u64,
    pub inspect_accesses: u64,
    pub merges: u64,
}

impl WitherMetricsRecorder for WitherMetrics {
    fn record_sweep(&mut self, report: &SweepReport) {
        self.sweeps += 1;
        if report.collapsed {
            self.root_collapses += 1;
        }
        self.nodes_visited += report.nodes_visited;
        self.skew_repairs += report.skew_repairs;
        self.self_evictions += report.self_evictions;
        self.children_detached += report.children_detached;
        self.protected_nodes += report.protected_nodes;
    }

    fn record_access(&mut self, inspect: bool) {
        if inspect {
            self.inspect_accesses += 1;
        } else {
            self.tracked_accesses += 1;
        }
    }

    fn record_merge(&mut self) {
        self.merges += 1;
    }
}

impl MetricsSnapshotProvider<WitherMetricsSnapshot> for WitherMetrics {
    fn snapshot(&self) -> WitherMetricsSnapshot {
        WitherMetricsSnapshot {
            sweeps: self.sweeps,
            root_collapses: self.root_collapses,
            nodes_visited: self.nodes_visited,
            skew_repairs: self.skew_repairs,
            self_evictions: self.self_evictions,
            children_detached: self.children_detached,
            protected_nodes: self.protected_nodes,
            tracked_accesses: self.tracked_accesses,
            inspect_accesses: self.inspect_accesses,
            merges: self.merges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_reports_are_summed() {
        let mut metrics = WitherMetrics::default();
        let report = SweepReport {
            nodes_visited: 4,
            self_evictions: 2,
            children_detached: 2,
            collapsed: true,
            ..SweepReport::default()
        };
        metrics.record_sweep(&report);
        metrics.record_sweep(&SweepReport::default());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sweeps, 2);
        assert_eq!(snapshot.root_collapses, 1);
        assert_eq!(snapshot.nodes_visited, 4);
        assert_eq!(snapshot.children_detached, 2);
    }

    #[test]
    fn accesses_split_by_kind() {
        let mut metrics = WitherMetrics::default();
        metrics.record_access(false);
        metrics.record_access(false);
        metrics.record_access(true);
        metrics.record_merge();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.tracked_accesses, 2);
        assert_eq!(snapshot.inspect_accesses, 1);
        assert_eq!(snapshot.merges, 1);
    }
}
