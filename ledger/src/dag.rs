//! The share forest and its prefix-sum maintenance.
//!
//! Two tables keyed by share hash: the immutable summaries and the mutable
//! aggregate nodes. Tree links are hashes, so every traversal re-resolves
//! through the table and nothing dangles when entries come and go.

use crate::chain::ChainWalk;
use crate::delta::DeltaSummary;
use crate::error::LedgerError;
use crate::node::AggregateNode;
use sharechain_types::{ShareHash, ShareSummary};
use sharechain_work::WorkUnit;
use std::collections::{HashMap, HashSet, VecDeque};

/// Forest of shares with per-share cumulative height, work and min-work.
#[derive(Clone, Debug, Default)]
pub struct DagLedger {
    shares: HashMap<ShareHash, ShareSummary>,
    nodes: HashMap<ShareHash, AggregateNode>,
    /// Declared-but-absent parent hash -> roots declaring it.
    ///
    /// Every root with a non-null `previous_hash` appears here exactly once.
    gaps: HashMap<ShareHash, HashSet<ShareHash>>,
}

impl DagLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn contains(&self, hash: &ShareHash) -> bool {
        self.shares.contains_key(hash)
    }

    pub fn get(&self, hash: &ShareHash) -> Option<&ShareSummary> {
        self.shares.get(hash)
    }

    pub fn node(&self, hash: &ShareHash) -> Option<&AggregateNode> {
        self.nodes.get(hash)
    }

    /// All shares, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ShareSummary> {
        self.shares.values()
    }

    fn node_of(&self, hash: &ShareHash) -> Result<&AggregateNode, LedgerError> {
        self.nodes.get(hash).ok_or(LedgerError::NotFound(*hash))
    }

    fn share_of(&self, hash: &ShareHash) -> Result<&ShareSummary, LedgerError> {
        self.shares.get(hash).ok_or(LedgerError::NotFound(*hash))
    }

    /// Add a share.
    ///
    /// If the declared parent is known the new node extends the parent's
    /// prefix sums; otherwise it becomes the root of a new tree. Existing
    /// roots that declared this share as their parent are left detached.
    pub fn insert(&mut self, share: ShareSummary) -> Result<(), LedgerError> {
        let hash = share.hash;
        if self.shares.contains_key(&hash) {
            return Err(LedgerError::AlreadyExists(hash));
        }

        let mut node = AggregateNode::for_share(&share);
        let parent = if share.has_parent() {
            self.nodes.get_mut(&share.previous_hash)
        } else {
            None
        };
        match parent {
            Some(parent) => {
                node.attach_below(share.previous_hash, parent);
                parent.children.insert(hash);
            }
            None if share.has_parent() => {
                self.gaps.entry(share.previous_hash).or_default().insert(hash);
            }
            None => {}
        }

        self.nodes.insert(hash, node);
        self.shares.insert(hash, share);
        Ok(())
    }

    /// Remove a share, detaching its children as new roots.
    ///
    /// Every descendant's sums are reduced by the removed node's sums, so
    /// they afterwards count from the removed node's position. Cost is
    /// proportional to the size of the removed subtree. Detached roots keep
    /// their stored `previous_hash`, which now names a gap.
    pub fn remove(&mut self, hash: &ShareHash) -> Result<ShareSummary, LedgerError> {
        let removed = self.node_of(hash)?;
        let prefix = removed.prefix();
        let parent = removed.parent;
        let children: Vec<ShareHash> = removed.children.iter().copied().collect();

        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.remove(hash);
                }
            }
            None => {
                let previous = self.share_of(hash)?.previous_hash;
                self.unrecord_gap(&previous, hash);
            }
        }

        let mut queue = VecDeque::with_capacity(children.len());
        for child in children {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent = None;
                self.gaps.entry(*hash).or_default().insert(child);
                queue.push_back(child);
            }
        }

        let mut rebased = 0usize;
        while let Some(next) = queue.pop_front() {
            if let Some(node) = self.nodes.get_mut(&next) {
                node.rebase_past(&prefix);
                queue.extend(node.children.iter().copied());
                rebased += 1;
            }
        }

        self.nodes.remove(hash);
        let share = self
            .shares
            .remove(hash)
            .ok_or(LedgerError::NotFound(*hash))?;
        tracing::debug!(hash = %hash, rebased, "removed share from ledger");
        Ok(share)
    }

    fn unrecord_gap(&mut self, gap: &ShareHash, root: &ShareHash) {
        if let Some(roots) = self.gaps.get_mut(gap) {
            roots.remove(root);
            if roots.is_empty() {
                self.gaps.remove(gap);
            }
        }
    }

    /// Whether `ancestor` lies strictly above `descendant` in its current tree.
    ///
    /// A share is not its own ancestor.
    pub fn is_ancestor(
        &self,
        descendant: &ShareHash,
        ancestor: &ShareHash,
    ) -> Result<bool, LedgerError> {
        let start = self.node_of(descendant)?;
        self.node_of(ancestor)?;

        let mut current = start.parent;
        while let Some(hash) = current {
            if hash == *ancestor {
                return Ok(true);
            }
            current = self.nodes.get(&hash).and_then(|n| n.parent);
        }
        Ok(false)
    }

    /// Height and work strictly below `tail` down to `head`.
    pub fn delta(&self, head: &ShareHash, tail: &ShareHash) -> Result<DeltaSummary, LedgerError> {
        let head_node = self.node_of(head)?;
        let tail_node = self.node_of(tail)?;
        if !self.is_ancestor(head, tail)? {
            return Err(LedgerError::NotAncestor {
                head: *head,
                tail: *tail,
            });
        }
        Ok(DeltaSummary {
            head: *head,
            tail: *tail,
            height_diff: head_node.cumulative_height - tail_node.cumulative_height,
            work_diff: head_node.cumulative_work - tail_node.cumulative_work,
            min_work_diff: head_node.cumulative_min_work - tail_node.cumulative_min_work,
        })
    }

    /// Root of the tree `hash` currently belongs to.
    pub fn root(&self, hash: &ShareHash) -> Result<ShareHash, LedgerError> {
        let mut current = *hash;
        let mut node = self.node_of(hash)?;
        while let Some(parent) = node.parent {
            current = parent;
            node = self.node_of(&parent)?;
        }
        Ok(current)
    }

    /// The gap beyond `hash`'s tree, and the delta from `hash` down to it.
    ///
    /// The gap is the root's stored `previous_hash`: NULL for a genuine
    /// genesis, otherwise a parent the tree is not linked to.
    pub fn root_boundary(&self, hash: &ShareHash) -> Result<(ShareHash, DeltaSummary), LedgerError> {
        let node = self.node_of(hash)?;
        let root = self.root(hash)?;
        let gap = self.share_of(&root)?.previous_hash;
        Ok((
            gap,
            DeltaSummary {
                head: *hash,
                tail: gap,
                height_diff: node.cumulative_height,
                work_diff: node.cumulative_work,
                min_work_diff: node.cumulative_min_work,
            },
        ))
    }

    /// Cumulative work from the root of `hash`'s tree down to `hash`.
    pub fn work(&self, hash: &ShareHash) -> Result<WorkUnit, LedgerError> {
        Ok(self.node_of(hash)?.cumulative_work)
    }

    pub fn min_work(&self, hash: &ShareHash) -> Result<WorkUnit, LedgerError> {
        Ok(self.node_of(hash)?.cumulative_min_work)
    }

    /// Number of shares from the root of `hash`'s tree down to `hash`, inclusive.
    pub fn height(&self, hash: &ShareHash) -> Result<u64, LedgerError> {
        Ok(self.node_of(hash)?.cumulative_height)
    }

    /// Walk `n` parent links up from `hash` and return the stored
    /// `previous_hash` of the share reached, i.e. the identifier one step
    /// beyond the `n`th ancestor.
    pub fn nth_ancestor(&self, hash: &ShareHash, n: u64) -> Result<ShareHash, LedgerError> {
        let mut current = *hash;
        let mut node = self.node_of(hash)?;
        for step in 0..n {
            match node.parent {
                Some(parent) => {
                    current = parent;
                    node = self.node_of(&parent)?;
                }
                None => {
                    return Err(LedgerError::InsufficientDepth {
                        hash: *hash,
                        requested: n,
                        reached: step,
                    })
                }
            }
        }
        Ok(self.share_of(&current)?.previous_hash)
    }

    /// Up to `n` hashes from `hash` toward its root, starting with `hash`.
    pub fn chain(&self, hash: &ShareHash, n: u64) -> ChainWalk<'_> {
        ChainWalk::new(self, *hash, n)
    }

    pub fn parent(&self, hash: &ShareHash) -> Result<Option<ShareHash>, LedgerError> {
        Ok(self.node_of(hash)?.parent)
    }

    pub fn children(
        &self,
        hash: &ShareHash,
    ) -> Result<impl Iterator<Item = ShareHash> + '_, LedgerError> {
        Ok(self.node_of(hash)?.children.iter().copied())
    }

    /// `hash` followed by all of its descendants, parents before children.
    pub fn subtree(&self, hash: &ShareHash) -> Result<Vec<ShareHash>, LedgerError> {
        self.node_of(hash)?;
        let mut order = vec![*hash];
        let mut cursor = 0;
        while cursor < order.len() {
            if let Some(node) = self.nodes.get(&order[cursor]) {
                order.extend(node.children.iter().copied());
            }
            cursor += 1;
        }
        Ok(order)
    }

    /// Shares with no parent link in the ledger.
    pub fn roots(&self) -> impl Iterator<Item = ShareHash> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(hash, _)| *hash)
    }

    /// Shares with no children.
    pub fn heads(&self) -> impl Iterator<Item = ShareHash> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(hash, _)| *hash)
    }

    /// Missing parents: each absent hash that some root declares as its
    /// parent, with the roots waiting on it.
    pub fn gaps(&self) -> impl Iterator<Item = (ShareHash, &HashSet<ShareHash>)> + '_ {
        self.gaps
            .iter()
            .filter(|(gap, _)| !self.shares.contains_key(*gap))
            .map(|(gap, roots)| (*gap, roots))
    }

    /// Roots that declare `hash` as their parent, whether or not it is present.
    pub fn orphans_of(&self, hash: &ShareHash) -> impl Iterator<Item = ShareHash> + '_ {
        self.gaps.get(hash).into_iter().flatten().copied()
    }

    /// The share with the most cumulative work; ties go to the lowest hash.
    pub fn best_tip(&self) -> Option<ShareHash> {
        self.nodes
            .iter()
            .max_by(|(ha, a), (hb, b)| {
                a.cumulative_work
                    .cmp(&b.cumulative_work)
                    .then_with(|| hb.cmp(ha))
            })
            .map(|(hash, _)| *hash)
    }
}
