//! LRU (Least Recently Used) cache engine
//!
//! A key index over a [`RecencyList`]. The index and the list always agree
//! on which entries are live; every removal goes through one eviction path
//! that fixes both before notifying the caller.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::{Iter, NodeRef, RecencyList};

/// Upper bound on slots reserved up front, whatever the capacity
const MAX_PREALLOC: usize = 4096;

/// Eviction notification, called once per entry leaving the cache.
///
/// Runs inline on the caller's thread after the cache is consistent again.
/// It cannot reach back into the cache that invoked it.
pub type OnEvicted<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// LRU cache with fixed capacity.
///
/// Not synchronized; see [`SharedLru`](crate::SharedLru) and
/// [`ShardedLru`](crate::ShardedLru) for concurrent use.
pub struct Lru<K, V> {
    capacity: usize,
    list: RecencyList<K, V>,
    index: HashMap<K, NodeRef, RandomState>,
    on_evicted: Option<OnEvicted<K, V>>,
}

impl<K, V> Lru<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Self::build(capacity, None)
    }

    /// Create a new LRU cache that reports every evicted entry to `on_evicted`
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` if `capacity` is zero
    pub fn with_eviction<F>(capacity: usize, on_evicted: F) -> Result<Self>
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        Self::build(capacity, Some(Box::new(on_evicted)))
    }

    fn build(capacity: usize, on_evicted: Option<OnEvicted<K, V>>) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        let prealloc = capacity.min(MAX_PREALLOC);

        Ok(Self {
            capacity,
            list: RecencyList::with_capacity(prealloc),
            index: HashMap::with_capacity_and_hasher(prealloc, RandomState::new()),
            on_evicted,
        })
    }

    /// Insert or update a key-value pair, marking it most recently used
    ///
    /// # Returns
    /// * `true` if the insert pushed the oldest entry out
    pub fn add(&mut self, key: K, value: V) -> bool {
        if let Some(&node) = self.index.get(&key) {
            if let Some(slot) = self.list.get_mut(node) {
                *slot = value;
            }
            self.list.move_to_front(node);
            return false;
        }

        let node = self.list.push_front(key.clone(), value);
        self.index.insert(key, node);

        if self.list.len() > self.capacity {
            self.evict_oldest();
            return true;
        }
        false
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.index.get(key)?;
        self.list.move_to_front(node);
        self.list.get(node).map(|(_, v)| v)
    }

    /// Get a value without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.index.get(key)?;
        self.list.get(node).map(|(_, v)| v)
    }

    /// Check for a key without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Peek at the least recently used entry
    pub fn get_oldest(&self) -> Option<(&K, &V)> {
        let node = self.list.back()?;
        self.list.get(node)
    }

    /// Evict the least recently used entry
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let node = self.list.back()?;
        self.evict(node)
    }

    /// Remove a key from the cache
    ///
    /// # Returns
    /// * `true` if the key was present
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.pop(key).is_some()
    }

    /// Remove a key from the cache and return its value
    pub fn pop<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.index.get(key)?;
        self.evict(node).map(|(_, v)| v)
    }

    /// Change the capacity, evicting the oldest entries that no longer fit
    ///
    /// # Returns
    /// * Number of entries evicted
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` if `new_capacity` is zero; nothing changes
    pub fn resize(&mut self, new_capacity: usize) -> Result<usize> {
        if new_capacity == 0 {
            return Err(Error::InvalidCapacity(new_capacity));
        }

        let diff = self.list.len().saturating_sub(new_capacity);
        for _ in 0..diff {
            self.evict_oldest();
        }
        debug!(
            old_capacity = self.capacity,
            new_capacity,
            evicted = diff,
            "lru resized"
        );
        self.capacity = new_capacity;
        Ok(diff)
    }

    /// Evict every entry, oldest first, then reset to empty
    pub fn purge(&mut self) {
        let count = self.list.len();
        while let Some(node) = self.list.back() {
            self.evict(node);
        }
        self.list.init();
        self.index.clear();
        debug!(evicted = count, "lru purged");
    }

    /// Snapshot of the keys, oldest to newest
    pub fn keys(&self) -> Vec<K> {
        self.list.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the values, oldest to newest
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.list.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Iterate over entries, oldest to newest
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) {
        if let Some(node) = self.list.back() {
            self.evict(node);
        }
    }

    fn evict(&mut self, node: NodeRef) -> Option<(K, V)> {
        let (key, value) = self.list.remove(node)?;
        self.index.remove(&key);
        trace!(len = self.list.len(), "lru entry evicted");

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&key, &value);
        }
        Some((key, value))
    }
}

impl<K, V> fmt::Debug for Lru<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lru")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}
