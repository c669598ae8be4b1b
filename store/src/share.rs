//! Share storage trait.

use crate::StoreError;
use sharechain_types::{ShareHash, ShareSummary};

/// Trait for share summary storage.
pub trait ShareStore {
    /// Store a share, replacing any previous entry with the same hash.
    fn put_share(&self, share: &ShareSummary) -> Result<(), StoreError>;

    /// Retrieve a share by hash.
    fn get_share(&self, hash: &ShareHash) -> Result<ShareSummary, StoreError>;

    /// Check if a share exists.
    fn exists(&self, hash: &ShareHash) -> Result<bool, StoreError>;

    /// Delete a share (for pruning).
    fn delete_share(&self, hash: &ShareHash) -> Result<(), StoreError>;

    /// Every stored share, in no particular order.
    fn iter_shares(&self) -> Result<Vec<ShareSummary>, StoreError>;

    /// Total number of shares in the store.
    fn share_count(&self) -> Result<u64, StoreError>;
}
