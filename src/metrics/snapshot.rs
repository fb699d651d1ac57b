#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WitherMetricsSnapshot {
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
