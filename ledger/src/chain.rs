//! Bounded walk from a share toward the root of its tree.

use crate::dag::DagLedger;
use sharechain_types::ShareHash;

/// Iterator over at most `remaining` share hashes, starting at the share it
/// was created for and following parent links.
///
/// Yields nothing if the starting share is not in the ledger.
pub struct ChainWalk<'a> {
    ledger: &'a DagLedger,
    next: Option<ShareHash>,
    remaining: u64,
}

impl<'a> ChainWalk<'a> {
    pub(crate) fn new(ledger: &'a DagLedger, start: ShareHash, limit: u64) -> Self {
        let next = ledger.contains(&start).then_some(start);
        Self {
            ledger,
            next,
            remaining: limit,
        }
    }
}

impl Iterator for ChainWalk<'_> {
    type Item = ShareHash;

    fn next(&mut self) -> Option<ShareHash> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.ledger.node(&current).and_then(|node| node.parent);
        Some(current)
    }
}
