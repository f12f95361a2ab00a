//! Keyed async locks, one per owner.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by owner. Writers for different owners never wait on
/// each other; entries are dropped once nobody holds or waits on them.
pub struct OwnerLocks<K>
where
    K: Eq + Hash + Copy,
{
    slots: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> OwnerLocks<K>
where
    K: Eq + Hash + Copy,
{
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: K) -> OwnerGuard<'_, K> {
        // The map shard guard must be released before awaiting.
        let slot = self
            .slots
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = slot.lock_owned().await;
        OwnerGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of owners currently locked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no owner is locked or waited on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K> Default for OwnerLocks<K>
where
    K: Eq + Hash + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to one owner, released on drop.
pub struct OwnerGuard<'a, K>
where
    K: Eq + Hash + Copy,
{
    locks: &'a OwnerLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K> Drop for OwnerGuard<'_, K>
where
    K: Eq + Hash + Copy,
{
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's own handle left: no holder, no waiter.
        self.locks
            .slots
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
    }
}
