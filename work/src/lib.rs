//! Work arithmetic for the share chain.
//!
//! A share's weight in chain comparison is the expected number of hash
//! attempts needed to meet its target. Cumulative sums of that weight are
//! what the ledger stores per share; the lookbehind window keeps the same
//! sums over only the most recent shares.

pub mod lookbehind;
pub mod target;

pub use lookbehind::LookbehindWindow;
pub use target::{work_from_target, WorkUnit};
