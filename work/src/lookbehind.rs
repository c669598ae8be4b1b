//! Rolling window over the most recently accepted shares.
//!
//! Difficulty statistics look at a fixed number of trailing shares rather
//! than whole-tree aggregates. The window keeps running sums of work and
//! min-work so neither query ever rescans the retained shares.

use crate::target::{work_from_target, WorkUnit};
use sharechain_types::{ShareSummary, U256, U512};
use std::collections::VecDeque;

/// Bounded FIFO of accepted shares with rolling work sums.
///
/// Holds at most `capacity` shares; pushing into a full window evicts the
/// oldest share first.
#[derive(Clone, Debug)]
pub struct LookbehindWindow {
    shares: VecDeque<ShareSummary>,
    capacity: usize,
    rolling_work: WorkUnit,
    rolling_min_work: WorkUnit,
}

impl LookbehindWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            shares: VecDeque::with_capacity(capacity),
            capacity,
            rolling_work: WorkUnit::ZERO,
            rolling_min_work: WorkUnit::ZERO,
        }
    }

    /// Append a share, evicting the oldest one if the window is full.
    pub fn push(&mut self, share: ShareSummary) {
        if self.capacity == 0 {
            return;
        }
        if self.shares.len() == self.capacity {
            if let Some(oldest) = self.shares.pop_front() {
                self.rolling_work -= work_from_target(oldest.target);
                self.rolling_min_work -= work_from_target(oldest.floor_target);
            }
        }
        self.rolling_work += work_from_target(share.target);
        self.rolling_min_work += work_from_target(share.floor_target);
        self.shares.push_back(share);
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of work over exactly the retained shares.
    pub fn rolling_work(&self) -> WorkUnit {
        self.rolling_work
    }

    /// Sum of min-work (work at each share's floor target) over the retained shares.
    pub fn rolling_min_work(&self) -> WorkUnit {
        self.rolling_min_work
    }

    pub fn oldest(&self) -> Option<&ShareSummary> {
        self.shares.front()
    }

    pub fn newest(&self) -> Option<&ShareSummary> {
        self.shares.back()
    }

    /// Retained shares, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ShareSummary> {
        self.shares.iter()
    }

    /// Pool hash rate implied by the window: rolling work over the time the
    /// retained shares span.
    ///
    /// `None` with fewer than two shares or when the span is not positive
    /// (authors' clocks can disagree).
    pub fn attempts_per_second(&self) -> Option<U256> {
        let (oldest, newest) = (self.shares.front()?, self.shares.back()?);
        if self.shares.len() < 2 {
            return None;
        }
        let span = newest.timestamp.as_secs().checked_sub(oldest.timestamp.as_secs())?;
        if span == 0 {
            return None;
        }
        let rate = self.rolling_work.as_u512() / U512::from(span);
        Some(U256::try_from(rate).unwrap_or(U256::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharechain_types::{ShareHash, Timestamp};

    fn share(n: u64, ts: u64, target: u64) -> ShareSummary {
        ShareSummary::new(
            ShareHash::from(n),
            ShareHash::from(n.saturating_sub(1)),
            Timestamp::new(ts),
            U256::from(target),
            U256::from(target * 2),
        )
    }

    #[test]
    fn empty_window() {
        let window = LookbehindWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.rolling_work(), WorkUnit::ZERO);
        assert_eq!(window.attempts_per_second(), None);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut window = LookbehindWindow::new(2);
        window.push(share(1, 10, 100));
        window.push(share(2, 20, 200));
        window.push(share(3, 30, 300));

        assert_eq!(window.len(), 2);
        assert_eq!(window.oldest().unwrap().hash, ShareHash::from(2));
        assert_eq!(window.newest().unwrap().hash, ShareHash::from(3));
        let expected =
            work_from_target(U256::from(200u64)) + work_from_target(U256::from(300u64));
        assert_eq!(window.rolling_work(), expected);
    }

    #[test]
    fn min_work_tracks_floor_targets() {
        let mut window = LookbehindWindow::new(4);
        window.push(share(1, 10, 100));
        window.push(share(2, 20, 100));
        let expected = work_from_target(U256::from(200u64)) + work_from_target(U256::from(200u64));
        assert_eq!(window.rolling_min_work(), expected);
        assert!(window.rolling_min_work() < window.rolling_work());
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut window = LookbehindWindow::new(0);
        window.push(share(1, 10, 100));
        assert!(window.is_empty());
        assert_eq!(window.rolling_work(), WorkUnit::ZERO);
    }

    #[test]
    fn attempts_per_second_over_span() {
        let mut window = LookbehindWindow::new(10);
        let target = (U256::one() << 224) - U256::one(); // 2^32 attempts each
        for (n, ts) in [(1u64, 100u64), (2, 150), (3, 200)] {
            window.push(ShareSummary::new(
                ShareHash::from(n),
                ShareHash::NULL,
                Timestamp::new(ts),
                target,
                target,
            ));
        }
        // 3 * 2^32 attempts over 100 seconds
        assert_eq!(
            window.attempts_per_second(),
            Some(U256::from(3u64 << 32) / U256::from(100u64))
        );
    }

    #[test]
    fn attempts_per_second_needs_positive_span() {
        let mut window = LookbehindWindow::new(10);
        window.push(share(1, 100, 100));
        assert_eq!(window.attempts_per_second(), None);
        window.push(share(2, 100, 100));
        assert_eq!(window.attempts_per_second(), None);
        window.push(share(3, 50, 100));
        assert_eq!(window.attempts_per_second(), None);
    }
}
