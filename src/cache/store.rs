//! In-memory response store.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::cache::key::ContentHash;
use crate::observability::metrics;

/// Response bodies keyed by the hash of the request that produced them.
///
/// Entries live for the whole process and are never evicted. Two identical
/// requests that miss at the same time both go upstream and both store their
/// result; the last write wins.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<ContentHash, Bytes>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored body under the shared lock.
    pub fn get(&self, hash: &ContentHash) -> Option<Bytes> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(hash).cloned()
    }

    /// Insert or overwrite under the exclusive lock.
    pub fn set(&self, hash: ContentHash, body: Bytes) {
        let len = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(hash, body);
            entries.len()
        };
        metrics::record_cache_size(len);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn get_after_set() {
        let cache = ResponseCache::new();
        let hash = ContentHash::of(b"request");

        assert!(cache.get(&hash).is_none());

        cache.set(hash.clone(), Bytes::from_static(b"{\"input_tokens\":12}"));
        assert_eq!(cache.get(&hash), Some(Bytes::from_static(b"{\"input_tokens\":12}")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unknown_hash_misses() {
        let cache = ResponseCache::new();
        cache.set(ContentHash::of(b"a"), Bytes::from_static(b"1"));

        assert!(cache.get(&ContentHash::of(b"b")).is_none());
    }

    #[test]
    fn set_overwrites() {
        let cache = ResponseCache::new();
        let hash = ContentHash::of(b"a");
        cache.set(hash.clone(), Bytes::from_static(b"1"));
        cache.set(hash.clone(), Bytes::from_static(b"2"));

        assert_eq!(cache.get(&hash), Some(Bytes::from_static(b"2")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let cache = Arc::new(ResponseCache::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let hash = ContentHash::of(&[i]);
                    cache.set(hash.clone(), Bytes::from(vec![i]));
                    assert_eq!(cache.get(&hash), Some(Bytes::from(vec![i])));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}
