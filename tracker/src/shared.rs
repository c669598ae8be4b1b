//! A tracker handle shared between threads.

use std::sync::{Arc, PoisonError, RwLock};

use sharechain_types::{Clock, SystemClock};

use crate::tracker::ShareTracker;

/// Cloneable handle around one [`ShareTracker`].
///
/// Queries take the read lock and may run concurrently; mutations take the
/// write lock, so no query observes a removal half-way through its re-basing.
pub struct SharedTracker<C: Clock = SystemClock> {
    inner: Arc<RwLock<ShareTracker<C>>>,
}

impl<C: Clock> SharedTracker<C> {
    pub fn new(tracker: ShareTracker<C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&ShareTracker<C>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut ShareTracker<C>) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<C: Clock> Clone for SharedTracker<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
