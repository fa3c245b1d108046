//! Per-key mutual exclusion
//!
//! 每个 key 一把 `parking_lot::Mutex`，不同 key 之间互不阻塞。
//! 锁条目在无人持有时回收，keyspace 再大也不会无限增长。

use dashmap::DashMap;
use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::Arc;

/// Keyed mutex map
///
/// Critical sections are synchronous and short (load → check → write).
/// Never hold a key across `.await` or network I/O.
pub struct KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Run `f` while holding the lock for `key`
    pub fn with_lock<R>(&self, key: &K, f: impl FnOnce() -> R) -> R {
        // Clone the Arc out so the DashMap shard lock is released before blocking
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        // Only the map still references it → nobody waiting, reclaim
        self.locks
            .remove_if(key, |_, held| Arc::strong_count(held) == 1);

        result
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
