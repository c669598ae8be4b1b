//! The share tracker: structural acceptance, verification and the
//! lookbehind window on top of the DAG ledger.

use std::collections::HashSet;

use sharechain_ledger::{ChainWalk, DagLedger, DeltaSummary};
use sharechain_types::{Clock, ShareHash, ShareSummary, SystemClock};
use sharechain_work::{LookbehindWindow, WorkUnit};
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::TrackerError;

/// Shares stamped further than this ahead of the local clock fail verification.
pub const MAX_FUTURE_DRIFT_SECS: u64 = 600;

/// Tracks every share seen by this node.
///
/// A share is *accepted* once it is in the ledger and *verified* once it has
/// passed [`ShareTracker::check`] with a verified (or null) parent. The
/// verified set is always a subset of the accepted set.
pub struct ShareTracker<C: Clock = SystemClock> {
    pub(crate) config: TrackerConfig,
    pub(crate) ledger: DagLedger,
    pub(crate) lookbehind: LookbehindWindow,
    pub(crate) accepted: HashSet<ShareHash>,
    pub(crate) verified: HashSet<ShareHash>,
    /// Pruned shares that surviving roots still name as their parent.
    pub(crate) pruned: HashSet<ShareHash>,
    pub(crate) best: Option<ShareHash>,
    pub(crate) clock: C,
}

impl ShareTracker<SystemClock> {
    pub fn with_system_clock(config: TrackerConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> ShareTracker<C> {
    pub fn new(config: TrackerConfig, clock: C) -> Self {
        let lookbehind = LookbehindWindow::new(config.lookbehind);
        Self {
            config,
            ledger: DagLedger::new(),
            lookbehind,
            accepted: HashSet::new(),
            verified: HashSet::new(),
            pruned: HashSet::new(),
            best: None,
            clock,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &DagLedger {
        &self.ledger
    }

    pub fn lookbehind(&self) -> &LookbehindWindow {
        &self.lookbehind
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn get(&self, hash: &ShareHash) -> Option<&ShareSummary> {
        self.ledger.get(hash)
    }

    pub fn shares(&self) -> impl Iterator<Item = &ShareSummary> {
        self.ledger.iter()
    }

    pub fn contains(&self, hash: &ShareHash) -> bool {
        self.ledger.contains(hash)
    }

    pub fn is_accepted(&self, hash: &ShareHash) -> bool {
        self.accepted.contains(hash)
    }

    pub fn is_verified(&self, hash: &ShareHash) -> bool {
        self.verified.contains(hash)
    }

    pub fn verified_count(&self) -> usize {
        self.verified.len()
    }

    /// Whether pruning is on and `share` is at least `max_age_secs` old.
    pub fn is_expired(&self, share: &ShareSummary) -> bool {
        let pruning = &self.config.pruning;
        pruning.enabled
            && share
                .timestamp
                .has_expired(pruning.max_age_secs, self.clock.now())
    }

    /// Best tip chosen by the last maintenance pass.
    pub fn best(&self) -> Option<ShareHash> {
        self.best
    }

    /// Structurally accept a share.
    ///
    /// Returns [`TrackerError::MissingParent`] when the share was inserted as
    /// the root of a new tree because its parent is unknown. That error is
    /// soft: the share stays accepted. Roots already waiting on this share
    /// are re-attached beneath it.
    ///
    /// With pruning enabled, shares past the pruning horizon are refused with
    /// [`TrackerError::ExpiredShare`] so pruned history cannot come back.
    pub fn add(&mut self, share: ShareSummary) -> Result<(), TrackerError> {
        let hash = share.hash;
        if self.accepted.contains(&hash) {
            return Err(TrackerError::DuplicateShare(hash));
        }
        if self.pruned.contains(&hash) || self.is_expired(&share) {
            return Err(TrackerError::ExpiredShare {
                hash,
                age_secs: share.timestamp.elapsed_since(self.clock.now()),
            });
        }
        let parent = share.previous_hash;

        self.ledger.insert(share.clone())?;
        self.lookbehind.push(share);
        self.accepted.insert(hash);
        self.adopt_orphans(&hash)?;

        if !parent.is_null() && !self.ledger.contains(&parent) {
            debug!(%hash, %parent, "share added without its parent");
            return Err(TrackerError::MissingParent { hash, parent });
        }
        Ok(())
    }

    /// Re-seat every tree whose root declares `hash` as its parent.
    ///
    /// Each subtree is taken out leaves first and put back parents first, so
    /// the cost is proportional to the adopted shares.
    fn adopt_orphans(&mut self, hash: &ShareHash) -> Result<(), TrackerError> {
        let mut orphans: Vec<ShareHash> = self.ledger.orphans_of(hash).collect();
        if orphans.is_empty() {
            return Ok(());
        }
        // A tree cannot be adopted by one of its own members.
        let own_root = self.ledger.root(hash)?;
        orphans.retain(|root| *root != own_root);
        if orphans.is_empty() {
            return Ok(());
        }
        orphans.sort();

        let mut adopted = 0usize;
        for root in orphans {
            let order = self.ledger.subtree(&root)?;
            let mut taken = Vec::with_capacity(order.len());
            for share in order.iter().rev() {
                taken.push(self.ledger.remove(share)?);
            }
            adopted += taken.len();
            for share in taken.into_iter().rev() {
                self.ledger.insert(share)?;
            }
        }
        debug!(parent = %hash, adopted, "re-attached orphaned shares");
        Ok(())
    }

    /// Remove a share from the tracker. Its children become roots.
    pub fn remove(&mut self, hash: &ShareHash) -> Result<ShareSummary, TrackerError> {
        let share = self.ledger.remove(hash)?;
        self.accepted.remove(hash);
        self.verified.remove(hash);
        if self.best == Some(*hash) {
            self.best = None;
        }
        Ok(share)
    }

    /// Why `share` would fail verification, if it would.
    pub fn check(&self, share: &ShareSummary) -> Result<(), TrackerError> {
        let ahead_secs = share.timestamp.ahead_of(self.clock.now());
        if ahead_secs > MAX_FUTURE_DRIFT_SECS {
            return Err(TrackerError::FutureTimestamp {
                hash: share.hash,
                ahead_secs,
            });
        }
        if share.has_parent() && !self.accepted.contains(&share.previous_hash) {
            return Err(TrackerError::UnknownParent {
                hash: share.hash,
                parent: share.previous_hash,
            });
        }
        Ok(())
    }

    /// Run the verification rules and record the share as verified on success.
    ///
    /// The rules run against the summary stored under `share.hash`, not the
    /// one passed in, so a forged summary cannot verify a stored share. A
    /// share that fails a rule is logged and reported as `Ok(false)`.
    /// Verifying an already verified share returns `Ok(true)` without
    /// re-checking.
    pub fn verify(&mut self, share: &ShareSummary) -> Result<bool, TrackerError> {
        let hash = share.hash;
        if self.verified.contains(&hash) {
            return Ok(true);
        }
        let stored = self.ledger.get(&hash);
        match self.check(stored.unwrap_or(share)) {
            Ok(()) => {}
            Err(reason) if reason.is_rejection() => {
                warn!(%hash, %reason, "share failed verification");
                return Ok(false);
            }
            Err(other) => return Err(other),
        }
        if stored.is_none() {
            return Err(TrackerError::UnknownShare(hash));
        }
        self.verified.insert(hash);
        Ok(true)
    }

    // ── Ledger queries ───────────────────────────────────────────────

    pub fn height(&self, hash: &ShareHash) -> Result<u64, TrackerError> {
        Ok(self.ledger.height(hash)?)
    }

    pub fn work(&self, hash: &ShareHash) -> Result<WorkUnit, TrackerError> {
        Ok(self.ledger.work(hash)?)
    }

    pub fn min_work(&self, hash: &ShareHash) -> Result<WorkUnit, TrackerError> {
        Ok(self.ledger.min_work(hash)?)
    }

    pub fn delta(&self, head: &ShareHash, tail: &ShareHash) -> Result<DeltaSummary, TrackerError> {
        Ok(self.ledger.delta(head, tail)?)
    }

    pub fn is_ancestor(&self, head: &ShareHash, tail: &ShareHash) -> Result<bool, TrackerError> {
        Ok(self.ledger.is_ancestor(head, tail)?)
    }

    pub fn root_boundary(
        &self,
        hash: &ShareHash,
    ) -> Result<(ShareHash, DeltaSummary), TrackerError> {
        Ok(self.ledger.root_boundary(hash)?)
    }

    pub fn nth_ancestor(&self, hash: &ShareHash, n: u64) -> Result<ShareHash, TrackerError> {
        Ok(self.ledger.nth_ancestor(hash, n)?)
    }

    pub fn chain(&self, hash: &ShareHash, n: u64) -> ChainWalk<'_> {
        self.ledger.chain(hash, n)
    }
}
