//! SharedLru: the LRU engine behind a mutex, with hit/miss statistics

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::Lru;
use crate::stats::CacheStats;

/// Cloneable, thread-safe handle to a single [`Lru`].
///
/// Values are cloned out so no borrow outlives the lock. The eviction
/// callback runs with the lock held and must not call back into the same
/// `SharedLru`.
pub struct SharedLru<K, V> {
    /// LRU engine
    cache: Arc<Mutex<Lru<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedLru<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> SharedLru<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_lru(Lru::new(capacity)?))
    }

    /// Create a new shared cache with an eviction callback
    pub fn with_eviction<F>(capacity: usize, on_evicted: F) -> Result<Self>
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        Ok(Self::from_lru(Lru::with_eviction(capacity, on_evicted)?))
    }

    /// Wrap an existing engine
    pub fn from_lru(lru: Lru<K, V>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(lru)),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Insert or update a key-value pair
    ///
    /// # Returns
    /// * `true` if the oldest entry was evicted to make room
    pub fn add(&self, key: K, value: V) -> bool {
        let mut cache = self.cache.lock();
        if cache.contains(&key) {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }

        let evicted = cache.add(key, value);
        if evicted {
            self.stats.record_evictions(1);
        }
        evicted
    }

    /// Get a clone of the value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a clone of the value without touching recency or statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().peek(key).cloned()
    }

    /// Check for a key without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.cache.lock().remove(key);
        if removed {
            self.stats.record_evictions(1);
        }
        removed
    }

    /// Peek at the least recently used entry
    pub fn get_oldest(&self) -> Option<(K, V)> {
        self.cache
            .lock()
            .get_oldest()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Evict the least recently used entry
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        let oldest = self.cache.lock().remove_oldest();
        if oldest.is_some() {
            self.stats.record_evictions(1);
        }
        oldest
    }

    /// Change the capacity, returning how many entries were evicted
    pub fn resize(&self, new_capacity: usize) -> Result<usize> {
        let evicted = self.cache.lock().resize(new_capacity)?;
        self.stats.record_evictions(evicted as u64);
        Ok(evicted)
    }

    /// Evict every entry
    pub fn purge(&self) {
        let mut cache = self.cache.lock();
        let count = cache.len();
        cache.purge();
        self.stats.record_evictions(count as u64);
    }

    /// Snapshot of the keys, oldest to newest
    pub fn keys(&self) -> Vec<K> {
        self.cache.lock().keys()
    }

    /// Snapshot of the values, oldest to newest
    pub fn values(&self) -> Vec<V> {
        self.cache.lock().values()
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
