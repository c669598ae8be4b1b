//! Loading the tracker from, and flushing it to, a [`ShareStore`].

use std::collections::{HashMap, HashSet, VecDeque};

use sharechain_store::ShareStore;
use sharechain_types::{Clock, ShareHash, ShareSummary};
use tracing::info;

use crate::tracker::ShareTracker;
use crate::TrackerError;

impl<C: Clock> ShareTracker<C> {
    /// Add every stored share, parents before children.
    ///
    /// Shares already tracked, and shares past the pruning horizon, are
    /// skipped. Returns how many were added.
    pub fn load_from<S: ShareStore>(&mut self, store: &S) -> Result<usize, TrackerError> {
        let ordered = parents_first(store.iter_shares()?);
        let mut loaded = 0usize;
        for share in ordered {
            match self.add(share) {
                Ok(()) => loaded += 1,
                Err(e) if e.is_soft() => loaded += 1,
                Err(TrackerError::DuplicateShare(_) | TrackerError::ExpiredShare { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        info!(loaded, total = self.len(), "loaded shares from store");
        Ok(loaded)
    }

    /// Write every tracked share the store does not hold yet.
    ///
    /// Returns how many shares were written.
    pub fn flush_to<S: ShareStore>(&self, store: &S) -> Result<usize, TrackerError> {
        let mut written = 0usize;
        for share in self.ledger.iter() {
            if !store.exists(&share.hash)? {
                store.put_share(share)?;
                written += 1;
            }
        }
        info!(written, "flushed shares to store");
        Ok(written)
    }
}

/// Order shares so that each comes after its parent when the parent is
/// among them. Trees are emitted root first, breadth first.
fn parents_first(shares: Vec<ShareSummary>) -> Vec<ShareSummary> {
    let present: HashSet<ShareHash> = shares.iter().map(|s| s.hash).collect();
    let mut children: HashMap<ShareHash, Vec<ShareSummary>> = HashMap::new();
    let mut queue = VecDeque::new();
    for share in shares {
        if share.has_parent() && present.contains(&share.previous_hash) {
            children.entry(share.previous_hash).or_default().push(share);
        } else {
            queue.push_back(share);
        }
    }
    queue.make_contiguous().sort_by_key(|s| s.hash);

    let mut ordered = Vec::with_capacity(present.len());
    while let Some(share) = queue.pop_front() {
        if let Some(mut kids) = children.remove(&share.hash) {
            kids.sort_by_key(|s| s.hash);
            queue.extend(kids);
        }
        ordered.push(share);
    }
    // Whatever is left only reaches itself through its parents.
    let mut rest: Vec<ShareSummary> = children.into_values().flatten().collect();
    rest.sort_by_key(|s| s.hash);
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use sharechain_nullables::{NullClock, NullShareStore};
    use sharechain_types::{Timestamp, U256};

    const NOW: u64 = 1_700_000_000;

    fn h(n: u64) -> ShareHash {
        ShareHash::from(n)
    }

    fn share(n: u64, prev: u64) -> ShareSummary {
        ShareSummary::new(
            h(n),
            if prev == 0 { ShareHash::NULL } else { h(prev) },
            Timestamp::new(NOW),
            U256::from(1u64) << 200,
            U256::from(1u64) << 210,
        )
    }

    fn tracker() -> ShareTracker<NullClock> {
        ShareTracker::new(TrackerConfig::default(), NullClock::new(NOW))
    }

    #[test]
    fn parents_first_orders_chains() {
        let shares = vec![share(3, 2), share(5, 4), share(2, 1), share(1, 0)];
        let order: Vec<_> = parents_first(shares).into_iter().map(|s| s.hash).collect();
        assert_eq!(order, vec![h(1), h(5), h(2), h(3)]);
    }

    #[test]
    fn load_rebuilds_the_forest() {
        let store = NullShareStore::with_shares(vec![
            share(4, 3),
            share(2, 1),
            share(3, 2),
            share(1, 0),
            share(11, 10),
        ]);
        let mut t = tracker();
        assert_eq!(t.load_from(&store).unwrap(), 5);
        assert_eq!(t.height(&h(4)).unwrap(), 4);
        assert_eq!(t.root_boundary(&h(11)).unwrap().0, h(10));

        // Loading twice adds nothing.
        assert_eq!(t.load_from(&store).unwrap(), 0);
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn flush_writes_only_new_shares() {
        let store = NullShareStore::with_shares(vec![share(1, 0)]);
        let mut t = tracker();
        t.add(share(1, 0)).unwrap();
        t.add(share(2, 1)).unwrap();
        t.add(share(3, 2)).unwrap();

        assert_eq!(t.flush_to(&store).unwrap(), 2);
        assert_eq!(store.share_count().unwrap(), 3);
        assert_eq!(t.flush_to(&store).unwrap(), 0);

        let mut reloaded = tracker();
        reloaded.load_from(&store).unwrap();
        assert_eq!(reloaded.work(&h(3)).unwrap(), t.work(&h(3)).unwrap());
    }

    #[test]
    fn load_skips_expired_shares() {
        let mut stale = share(1, 0);
        stale.timestamp = Timestamp::new(NOW - 10_000);
        let store = NullShareStore::with_shares(vec![stale, share(2, 1)]);
        let config = TrackerConfig {
            pruning: crate::config::PruningConfig {
                enabled: true,
                max_age_secs: 1_000,
                batch_size: 10,
            },
            ..Default::default()
        };
        let mut t = ShareTracker::new(config, NullClock::new(NOW));
        assert_eq!(t.load_from(&store).unwrap(), 1);
        assert!(!t.contains(&h(1)));
        assert!(t.contains(&h(2)));
    }
}
