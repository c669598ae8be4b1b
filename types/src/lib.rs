//! Fundamental types for the share-chain ledger.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! share identifiers, timestamps and clocks, and the immutable share summary that
//! the wire layer hands to the ledger.

pub mod hash;
pub mod share;
pub mod time;

pub use hash::ShareHash;
pub use primitive_types::{U256, U512};
pub use share::ShareSummary;
pub use time::{Clock, SystemClock, Timestamp};
