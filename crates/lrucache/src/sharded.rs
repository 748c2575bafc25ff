//! ShardedLru: keys spread over independent engines to cut lock contention
//!
//! Each shard keeps its own recency order, so eviction is LRU per shard,
//! not across the whole cache.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::LruConfig;
use crate::error::Result;
use crate::lru::Lru;
use crate::stats::CacheStats;

type SharedCallback<K, V> = Arc<dyn Fn(&K, &V) + Send + Sync>;

/// Thread-safe LRU cache split into `config.shards` engines
pub struct ShardedLru<K, V> {
    shards: Box<[Mutex<Lru<K, V>>]>,
    hasher: RandomState,
    stats: CacheStats,
}

impl<K, V> ShardedLru<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: Clone + 'static,
{
    /// Create a sharded cache from a validated config
    pub fn new(config: &LruConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a sharded cache whose shards all report to `on_evicted`
    pub fn with_eviction<F>(config: &LruConfig, on_evicted: F) -> Result<Self>
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        Self::build(config, Some(Arc::new(on_evicted)))
    }

    fn build(config: &LruConfig, on_evicted: Option<SharedCallback<K, V>>) -> Result<Self> {
        config.validate()?;
        let per_shard = config.shard_capacity();

        let shards = (0..config.shards)
            .map(|_| -> Result<Mutex<Lru<K, V>>> {
                let lru = match &on_evicted {
                    Some(callback) => {
                        let callback = Arc::clone(callback);
                        Lru::with_eviction(per_shard, move |k: &K, v: &V| callback(k, v))?
                    }
                    None => Lru::new(per_shard)?,
                };
                Ok(Mutex::new(lru))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(shards = config.shards, per_shard, "sharded lru created");

        Ok(Self {
            shards: shards.into_boxed_slice(),
            hasher: RandomState::new(),
            stats: CacheStats::new(),
        })
    }

    fn shard<Q>(&self, key: &Q) -> &Mutex<Lru<K, V>>
    where
        Q: Hash + ?Sized,
    {
        let hash = BuildHasher::hash_one(&self.hasher, key);
        &self.shards[(hash as usize) % self.shards.len()]
    }

    /// Insert or update a key-value pair in its shard
    pub fn add(&self, key: K, value: V) -> bool {
        let mut shard = self.shard(&key).lock();
        if shard.contains(&key) {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }

        let evicted = shard.add(key, value);
        if evicted {
            self.stats.record_evictions(1);
        }
        evicted
    }

    /// Get a clone of the value, marking it most recently used in its shard
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.shard(key).lock().get(key).cloned();
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Get a clone of the value without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).lock().peek(key).cloned()
    }

    /// Remove a key from its shard
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.shard(key).lock().remove(key);
        if removed {
            self.stats.record_evictions(1);
        }
        removed
    }

    /// Evict every entry in every shard
    pub fn purge(&self) {
        for shard in self.shards.iter() {
            let mut shard = shard.lock();
            let count = shard.len();
            shard.purge();
            self.stats.record_evictions(count as u64);
        }
    }

    /// Total entries across shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Check if every shard is empty
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Sum of shard capacities
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().capacity()).sum()
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
