//! Exchange deduplication using xxhash.
//!
//! Chunking an answer costs a model call, so byte-identical exchanges are chunked once and the
//! result is replayed from a bounded [`ChunkCache`].

use std::num::NonZeroUsize;

use cura_core::ChunkRecord;
use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::{Xxh3, xxh3_64};

/// Computes a content hash for deduplication.
#[must_use]
pub fn content_hash(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// Hashes a query/response pair.
///
/// A unit separator sits between the two parts, so `("ab", "c")` and `("a", "bc")` differ.
#[must_use]
pub fn exchange_hash(query: &str, response: &str) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(query.as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(response.as_bytes());
    hasher.digest()
}

/// Bounded cache from exchange hash to its chunking result.
///
/// Shared across users: the same answer chunks the same way regardless of who asked.
#[derive(Debug)]
pub struct ChunkCache {
    entries: Mutex<LruCache<u64, Vec<ChunkRecord>>>,
}

impl ChunkCache {
    /// Creates a cache holding at most `capacity` results (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached chunks for `key`, refreshing its recency.
    #[must_use]
    pub fn get(&self, key: u64) -> Option<Vec<ChunkRecord>> {
        self.entries.lock().get(&key).cloned()
    }

    /// Stores the chunks for `key`.
    pub fn insert(&self, key: u64, chunks: Vec<ChunkRecord>) {
        self.entries.lock().put(key, chunks);
    }

    /// Number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_hash() {
        let text = "Hello, world!";
        assert_eq!(content_hash(text), content_hash(text));
        assert_ne!(content_hash(text), content_hash("Goodbye, world!"));
    }

    #[test]
    fn exchange_hash_separates_parts() {
        assert_ne!(exchange_hash("ab", "c"), exchange_hash("a", "bc"));
        assert_eq!(exchange_hash("q", "r"), exchange_hash("q", "r"));
    }

    #[test]
    fn cache_evicts_least_recent() {
        let cache = ChunkCache::new(2);
        cache.insert(1, vec![ChunkRecord::new("a", "one")]);
        cache.insert(2, vec![ChunkRecord::new("b", "two")]);
        assert!(cache.get(1).is_some());
        cache.insert(3, vec![ChunkRecord::new("c", "three")]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(2).is_none());
        assert_eq!(cache.get(1).unwrap()[0].text, "one");
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let cache = ChunkCache::new(0);
        cache.insert(1, Vec::new());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
