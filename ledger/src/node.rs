//! Per-share aggregate record.

use sharechain_types::{ShareHash, ShareSummary};
use sharechain_work::{work_from_target, WorkUnit};
use std::collections::HashSet;

/// Prefix sums and tree links for one share.
///
/// The cumulative fields cover the path from the root of the share's current
/// tree down to the share itself, inclusive. `parent` and `children` are
/// lookup keys into the ledger's table; they never own anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateNode {
    pub cumulative_height: u64,
    pub cumulative_work: WorkUnit,
    pub cumulative_min_work: WorkUnit,
    /// `None` while this share is the root of its tree.
    pub parent: Option<ShareHash>,
    pub children: HashSet<ShareHash>,
}

impl AggregateNode {
    /// A root node covering only `share` itself.
    pub(crate) fn for_share(share: &ShareSummary) -> Self {
        Self {
            cumulative_height: 1,
            cumulative_work: work_from_target(share.target),
            cumulative_min_work: work_from_target(share.floor_target),
            parent: None,
            children: HashSet::new(),
        }
    }

    /// Extend this node's sums by everything above `parent` and link to it.
    pub(crate) fn attach_below(&mut self, parent_hash: ShareHash, parent: &AggregateNode) {
        self.cumulative_height += parent.cumulative_height;
        self.cumulative_work += parent.cumulative_work;
        self.cumulative_min_work += parent.cumulative_min_work;
        self.parent = Some(parent_hash);
    }

    /// Drop the prefix that `removed` contributed.
    pub(crate) fn rebase_past(&mut self, removed: &Prefix) {
        self.cumulative_height -= removed.height;
        self.cumulative_work -= removed.work;
        self.cumulative_min_work -= removed.min_work;
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn prefix(&self) -> Prefix {
        Prefix {
            height: self.cumulative_height,
            work: self.cumulative_work,
            min_work: self.cumulative_min_work,
        }
    }
}

/// Snapshot of a removed node's sums, subtracted from each descendant.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Prefix {
    pub height: u64,
    pub work: WorkUnit,
    pub min_work: WorkUnit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharechain_types::{Timestamp, U256};

    fn share(n: u64, target: u64) -> ShareSummary {
        ShareSummary::new(
            ShareHash::from(n),
            ShareHash::NULL,
            Timestamp::new(0),
            U256::from(target),
            U256::from(target * 4),
        )
    }

    #[test]
    fn fresh_node_is_a_root_of_height_one() {
        let node = AggregateNode::for_share(&share(1, 1_000));
        assert!(node.is_root());
        assert!(node.is_leaf());
        assert_eq!(node.cumulative_height, 1);
        assert_eq!(node.cumulative_work, work_from_target(U256::from(1_000u64)));
    }

    #[test]
    fn attach_then_rebase_restores_own_values() {
        let parent = AggregateNode::for_share(&share(1, 1_000));
        let own = AggregateNode::for_share(&share(2, 5_000));
        let mut child = own.clone();
        child.attach_below(ShareHash::from(1), &parent);

        assert_eq!(child.cumulative_height, 2);
        assert_eq!(child.parent, Some(ShareHash::from(1)));

        child.rebase_past(&parent.prefix());
        assert_eq!(child.cumulative_height, own.cumulative_height);
        assert_eq!(child.cumulative_work, own.cumulative_work);
        assert_eq!(child.cumulative_min_work, own.cumulative_min_work);
    }
}
