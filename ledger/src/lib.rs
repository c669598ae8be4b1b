//! Share-chain DAG ledger.
//!
//! Shares reference a previous share by hash, so the known shares form a
//! forest rather than one chain. Every share carries prefix sums (height,
//! work, min-work) over the path to the root of its current tree, which makes
//! distance queries between a share and any ancestor O(1) after the ancestry
//! check. Removing a share re-bases its descendants in time proportional to
//! the removed subtree, never to the depth of the chain.
//!
//! The ledger is not synchronized. Callers serialize mutations and must not
//! read while a removal is in progress.

pub mod chain;
pub mod dag;
pub mod delta;
pub mod error;
pub mod node;

pub use chain::ChainWalk;
pub use dag::DagLedger;
pub use delta::DeltaSummary;
pub use error::LedgerError;
pub use node::AggregateNode;
