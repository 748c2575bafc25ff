//! # mapopts
//!
//! A map of options paired with its keys in ascending order.
//!
//! Keys are sorted once at construction; value lookups go through an
//! AHash map afterwards.

#![warn(missing_docs)]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

/// Options keyed by an orderable type, with a precomputed sorted key list
#[derive(Debug, Clone)]
pub struct SortedOptions<K, V> {
    keys: Vec<K>,
    options: HashMap<K, V, RandomState>,
}

impl<K, V> SortedOptions<K, V>
where
    K: Ord + Hash + Clone,
{
    /// Build from any collection of key/value pairs.
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let options: HashMap<K, V, RandomState> = options.into_iter().collect();
        let mut keys: Vec<K> = options.keys().cloned().collect();
        keys.sort();

        Self { keys, options }
    }

    /// Keys in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Value for a key
    pub fn option<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.options.get(key)
    }

    /// The underlying map
    pub fn options(&self) -> &HashMap<K, V, RandomState> {
        &self.options
    }

    /// Iterate over pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.keys
            .iter()
            .filter_map(move |k| self.options.get_key_value(k))
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no options
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for SortedOptions<K, V>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::new(map)
    }
}

/// Value for `key`, or `V::default()` when absent
pub fn lookup_or_default<K, V, S>(map: &HashMap<K, V, S>, key: &K) -> V
where
    K: Hash + Eq,
    V: Clone + Default,
    S: BuildHasher,
{
    map.get(key).cloned().unwrap_or_default()
}
