//! Nullable store: thread-safe in-memory share storage for testing.

use sharechain_store::{ShareStore, StoreError};
use sharechain_types::{ShareHash, ShareSummary};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// An in-memory share store for testing.
#[derive(Default)]
pub struct NullShareStore {
    shares: Mutex<HashMap<ShareHash, ShareSummary>>,
}

impl NullShareStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, as if the shares had been written by an earlier run.
    pub fn with_shares(shares: impl IntoIterator<Item = ShareSummary>) -> Self {
        let store = Self::new();
        store
            .lock()
            .extend(shares.into_iter().map(|s| (s.hash, s)));
        store
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ShareHash, ShareSummary>> {
        self.shares
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ShareStore for NullShareStore {
    fn put_share(&self, share: &ShareSummary) -> Result<(), StoreError> {
        self.lock().insert(share.hash, share.clone());
        Ok(())
    }

    fn get_share(&self, hash: &ShareHash) -> Result<ShareSummary, StoreError> {
        self.lock()
            .get(hash)
            .cloned()
            .ok_or(StoreError::NotFound(*hash))
    }

    fn exists(&self, hash: &ShareHash) -> Result<bool, StoreError> {
        Ok(self.lock().contains_key(hash))
    }

    fn delete_share(&self, hash: &ShareHash) -> Result<(), StoreError> {
        self.lock().remove(hash);
        Ok(())
    }

    fn iter_shares(&self) -> Result<Vec<ShareSummary>, StoreError> {
        Ok(self.lock().values().cloned().collect())
    }

    fn share_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharechain_types::{Timestamp, U256};

    fn share(n: u64) -> ShareSummary {
        ShareSummary::new(
            ShareHash::from(n),
            ShareHash::NULL,
            Timestamp::new(n),
            U256::from(n),
            U256::from(n),
        )
    }

    #[test]
    fn put_get_delete() {
        let store = NullShareStore::new();
        store.put_share(&share(1)).unwrap();
        assert!(store.exists(&ShareHash::from(1)).unwrap());
        assert_eq!(store.get_share(&ShareHash::from(1)).unwrap(), share(1));
        assert_eq!(store.share_count().unwrap(), 1);

        store.delete_share(&ShareHash::from(1)).unwrap();
        assert!(matches!(
            store.get_share(&ShareHash::from(1)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn prepopulated_store_lists_everything() {
        let store = NullShareStore::with_shares((1..=3).map(share));
        let mut hashes: Vec<_> = store.iter_shares().unwrap().into_iter().map(|s| s.hash).collect();
        hashes.sort();
        assert_eq!(hashes, vec![ShareHash::from(1), ShareHash::from(2), ShareHash::from(3)]);
    }
}
