//! Aggregate difference between a share and one of its ancestors.

use sharechain_types::ShareHash;
use sharechain_work::WorkUnit;

/// Height and work along the path from `tail` (exclusive) down to `head`
/// (inclusive).
///
/// For a delta produced by [`crate::DagLedger::root_boundary`], `tail` is the
/// gap identifier beyond the root, which need not be a known share.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeltaSummary {
    pub head: ShareHash,
    pub tail: ShareHash,
    pub height_diff: u64,
    pub work_diff: WorkUnit,
    pub min_work_diff: WorkUnit,
}
