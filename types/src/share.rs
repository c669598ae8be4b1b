//! Immutable summary of a single share.

use crate::{ShareHash, Timestamp};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// The fields of a share the ledger needs: identity, linkage, time and targets.
///
/// Produced by the wire-deserialization layer; the ledger never parses bytes.
/// `floor_target >= target` is assumed to have been checked upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSummary {
    pub hash: ShareHash,
    /// [`ShareHash::NULL`] when the author declared no parent.
    pub previous_hash: ShareHash,
    pub timestamp: Timestamp,
    pub target: U256,
    /// The easiest target the share could have been accepted at (p2pool's `max_target`).
    pub floor_target: U256,
}

impl ShareSummary {
    pub fn new(
        hash: ShareHash,
        previous_hash: ShareHash,
        timestamp: Timestamp,
        target: U256,
        floor_target: U256,
    ) -> Self {
        Self {
            hash,
            previous_hash,
            timestamp,
            target,
            floor_target,
        }
    }

    /// Whether the share names a parent at all.
    pub fn has_parent(&self) -> bool {
        !self.previous_hash.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(prev: ShareHash) -> ShareSummary {
        ShareSummary::new(
            ShareHash::from(7),
            prev,
            Timestamp::new(1_000),
            U256::from(1_000u64),
            U256::from(4_000u64),
        )
    }

    #[test]
    fn null_previous_means_no_parent() {
        assert!(!summary(ShareHash::NULL).has_parent());
        assert!(summary(ShareHash::from(6)).has_parent());
    }

    #[test]
    fn json_keeps_every_field() {
        let share = summary(ShareHash::from(6));
        let json = serde_json::to_string(&share).unwrap();
        let back: ShareSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, share);
    }
}
