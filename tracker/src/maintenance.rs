//! Periodic maintenance: age-based pruning, the verification frontier and
//! best-tip selection.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use sharechain_types::{Clock, ShareHash, Timestamp};
use tracing::{debug, info};

use crate::tracker::ShareTracker;
use crate::TrackerError;

/// Outcome of one [`ShareTracker::maintain`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// Highest-work share after this pass.
    pub best: Option<ShareHash>,
    /// Shares that became verified during this pass, parents first.
    pub newly_verified: Vec<ShareHash>,
    /// Shares removed for age, oldest first.
    pub pruned: Vec<ShareHash>,
    /// Missing parents worth requesting from peers, sorted.
    pub desired: Vec<ShareHash>,
}

impl<C: Clock> ShareTracker<C> {
    /// Prune, extend verification, then pick the best tip and the gaps to fill.
    pub fn maintain(&mut self) -> Result<MaintenanceReport, TrackerError> {
        let pruned = self.prune_expired()?;
        let newly_verified = self.advance_verification()?;

        self.best = self.ledger.best_tip();
        // Pruned parents stay out of `desired`; asking peers for them would
        // only re-grow history that was dropped on purpose.
        let ledger = &self.ledger;
        self.pruned.retain(|hash| ledger.orphans_of(hash).next().is_some());
        let mut desired: Vec<ShareHash> = self
            .ledger
            .gaps()
            .map(|(gap, _)| gap)
            .filter(|gap| !self.pruned.contains(gap))
            .collect();
        desired.sort();

        info!(
            shares = self.ledger.len(),
            verified = self.verified.len(),
            pruned = pruned.len(),
            newly_verified = newly_verified.len(),
            desired = desired.len(),
            best = ?self.best,
            "tracker maintenance complete"
        );

        Ok(MaintenanceReport {
            best: self.best,
            newly_verified,
            pruned,
            desired,
        })
    }

    /// Remove tree roots at least the configured age old, up to one batch.
    ///
    /// Removing a root exposes its children as roots, so old chains are
    /// trimmed from the bottom up across passes.
    fn prune_expired(&mut self) -> Result<Vec<ShareHash>, TrackerError> {
        let pruning = &self.config.pruning;
        if !pruning.enabled || pruning.batch_size == 0 {
            return Ok(Vec::new());
        }
        let batch_size = pruning.batch_size;

        let mut candidates: BinaryHeap<Reverse<(Timestamp, ShareHash)>> = self
            .ledger
            .roots()
            .filter_map(|root| self.ledger.get(&root))
            .filter(|share| self.is_expired(share))
            .map(|share| Reverse((share.timestamp, share.hash)))
            .collect();

        let mut pruned = Vec::new();
        while pruned.len() < batch_size {
            let Some(Reverse((_, hash))) = candidates.pop() else {
                break;
            };
            let children: Vec<ShareHash> = self.ledger.children(&hash)?.collect();
            self.remove(&hash)?;
            pruned.push(hash);
            if !children.is_empty() {
                self.pruned.insert(hash);
            }
            for child in children {
                if let Some(share) = self.ledger.get(&child) {
                    if self.is_expired(share) {
                        candidates.push(Reverse((share.timestamp, child)));
                    }
                }
            }
        }

        if !pruned.is_empty() {
            debug!(
                count = pruned.len(),
                max_age_secs = self.config.pruning.max_age_secs,
                "pruned expired shares"
            );
        }
        Ok(pruned)
    }

    /// Verify every accepted share whose parent is verified or null,
    /// repeatedly, until nothing more passes.
    fn advance_verification(&mut self) -> Result<Vec<ShareHash>, TrackerError> {
        let mut queue: VecDeque<ShareHash> = self
            .ledger
            .iter()
            .filter(|share| !self.verified.contains(&share.hash))
            .filter(|share| !share.has_parent() || self.verified.contains(&share.previous_hash))
            .map(|share| share.hash)
            .collect();
        queue.make_contiguous().sort();

        let mut newly_verified = Vec::new();
        while let Some(hash) = queue.pop_front() {
            if self.verified.contains(&hash) {
                continue;
            }
            let Some(share) = self.ledger.get(&hash).cloned() else {
                continue;
            };
            if !self.verify(&share)? {
                continue;
            }
            newly_verified.push(hash);
            let mut children: Vec<ShareHash> = self
                .ledger
                .children(&hash)?
                .filter(|child| !self.verified.contains(child))
                .collect();
            children.sort();
            queue.extend(children);
        }
        Ok(newly_verified)
    }
}
