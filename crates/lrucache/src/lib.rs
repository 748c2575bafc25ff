//! # lrucache
//!
//! Bounded, single-process LRU cache.
//!
//! ## Architecture
//! - **Recency list**: arena-backed circular list with a sentinel slot,
//!   O(1) push/move/remove at any position
//! - **Index**: AHash map from key to list handle (O(1) lookup)
//! - **Eviction**: one shared path keeps index and list in agreement, then
//!   notifies the optional callback
//!
//! [`Lru`] itself is unsynchronized. Wrap it in [`SharedLru`] for a single
//! locked engine, or use [`ShardedLru`] to spread keys over several.
//!
//! ```
//! use lrucache::Lru;
//!
//! let mut cache = Lru::new(2).unwrap();
//! cache.add("a", 1);
//! cache.add("b", 2);
//! cache.get("a");
//! assert!(cache.add("c", 3));
//! assert_eq!(cache.keys(), vec!["a", "c"]);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod list;
mod lru;
mod sharded;
mod shared;
mod stats;

pub use config::{LruConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use list::{Iter, NodeRef, RecencyList};
pub use lru::{Lru, OnEvicted};
pub use sharded::ShardedLru;
pub use shared::SharedLru;
pub use stats::CacheStats;
