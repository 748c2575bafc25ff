//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default cache capacity (number of items)
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Sizing for a [`ShardedLru`](crate::ShardedLru)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LruConfig {
    /// Total number of entries across all shards
    pub capacity: usize,

    /// Number of independent engines keys are spread over
    pub shards: usize,
}

impl Default for LruConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            shards: 1,
        }
    }
}

impl LruConfig {
    /// Single-shard config with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the shard count
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Parse and validate a JSON document such as `{"capacity": 512, "shards": 8}`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that capacity and shard count are positive
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        if self.shards == 0 {
            return Err(Error::InvalidShardCount(self.shards));
        }
        Ok(())
    }

    /// Capacity of each shard, rounded up so the total is never short
    pub fn shard_capacity(&self) -> usize {
        self.capacity.div_ceil(self.shards.max(1))
    }
}
