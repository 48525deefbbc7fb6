//! Fixed-capacity cache with first-in, first-out eviction.
//!
//! Eviction follows the order in which keys were first inserted, not
//! access recency. Replacing the value of a cached key keeps its original
//! position in the eviction queue.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of entries per cache.
pub const DEFAULT_CACHE_SIZE: usize = 100;

/// A bounded FIFO cache safe for concurrent use.
///
/// The lock is only held for map bookkeeping, never across an `.await`.
/// A capacity of zero disables caching (every insert is dropped).
#[derive(Debug)]
pub struct FifoCache<K, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

#[derive(Debug)]
struct Inner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a clone of the cached value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().entries.get(key).cloned()
    }

    /// Returns `true` if `key` is cached.
    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Inserts `value` under `key`, evicting the oldest entry when full.
    ///
    /// Returns the evicted key, if any.
    pub fn insert(&self, key: K, value: V) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }

        let mut inner = self.lock();

        if let Some(slot) = inner.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if inner.entries.len() >= self.capacity {
            let oldest = inner.order.pop_front();
            if let Some(ref key) = oldest {
                inner.entries.remove(key);
            }
            oldest
        } else {
            None
        };

        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
        evicted
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Keys in eviction order (oldest first).
    pub fn keys(&self) -> Vec<K> {
        self.lock().order.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_after_insert() {
        let cache = FifoCache::new(2);
        cache.insert("pikachu", 25);
        assert_eq!(cache.get(&"pikachu"), Some(25));
        assert_eq!(cache.get(&"eevee"), None);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let cache = FifoCache::new(2);
        assert_eq!(cache.insert("a", 1), None);
        assert_eq!(cache.insert("b", 2), None);
        assert_eq!(cache.insert("c", 3), Some("a"));
        assert!(!cache.contains_key(&"a"));
        assert_eq!(cache.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_reads_do_not_refresh_position() {
        let cache = FifoCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // An LRU would keep "a" here.
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);
        assert!(!cache.contains_key(&"a"));
        assert!(cache.contains_key(&"b"));
    }

    #[test]
    fn test_replace_keeps_original_position() {
        let cache = FifoCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.insert("a", 10), None);
        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.insert("c", 3), Some("a"));
        assert_eq!(cache.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = FifoCache::new(0);
        assert_eq!(cache.insert("a", 1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = FifoCache::new(3);
        cache.insert(1, "x");
        cache.insert(2, "y");
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 1usize..16,
            keys in proptest::collection::vec(0u8..64, 0..200),
        ) {
            let cache = FifoCache::new(capacity);
            for key in keys {
                cache.insert(key, u32::from(key));
                prop_assert!(cache.len() <= capacity);
                prop_assert_eq!(cache.keys().len(), cache.len());
            }
        }

        #[test]
        fn prop_first_key_evicted_after_overflow(capacity in 1usize..32) {
            let cache = FifoCache::new(capacity);
            for key in 0..=capacity {
                cache.insert(key, key);
            }
            prop_assert!(!cache.contains_key(&0));
            for key in 1..=capacity {
                prop_assert!(cache.contains_key(&key));
            }
        }
    }
}
