pub use crate::builder::{GenerationBuilder, GenerationConfig};
pub use crate::ds::{Generation, GenerationState};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::WitherMetricsSnapshot;
pub use crate::policy::wither::SweepReport;
pub use crate::traits::{
    AccessConfig, GenerationStamped, MergeAfter, RangeTraversal, Rejuvenatable, UncachedRanges,
    WitherNode, Witherable,
};
pub use crate::tree::{CacheNode, GenerationTree, Slot};
