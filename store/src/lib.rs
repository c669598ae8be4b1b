//! Abstract storage trait for the share chain.
//!
//! The ledger keeps everything in memory. Backends that persist shares
//! between runs implement [`ShareStore`]; the tracker flushes to and loads
//! from it, and the rest of the codebase depends only on the trait.

pub mod error;
pub mod share;

pub use error::StoreError;
pub use share::ShareStore;
