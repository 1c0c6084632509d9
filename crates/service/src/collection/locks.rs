use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per collection name, created on first use.
///
/// Holding the guard gives exclusive access to that collection's store for a
/// whole read-modify-write sequence. Different names never contend. An entry
/// is dropped from the map once its last guard is released and nobody is
/// waiting on it.
#[derive(Default)]
pub struct CollectionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Exclusive access to one collection; prunes the lock entry on drop.
pub struct CollectionGuard<'a> {
    locks: &'a CollectionLocks,
    collection: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, collection: &str) -> CollectionGuard<'_> {
        // clone the Arc so the map shard is released before awaiting
        let lock = Arc::clone(
            self.locks
                .entry(collection.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let guard = lock.lock_owned().await;
        CollectionGuard { locks: self, collection: collection.to_string(), guard: Some(guard) }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for CollectionGuard<'_> {
    fn drop(&mut self) {
        // release the mutex first so its Arc no longer counts
        drop(self.guard.take());
        // waiters hold their own clone; only the map's reference left means idle
        self.locks
            .locks
            .remove_if(&self.collection, |_, lock| Arc::strong_count(lock) == 1);
    }
}
