// Time-based in-memory cache
//
// Entries are stamped with the Instant they were stored and treated as absent
// once older than the TTL. Owners wrap it in `tokio::sync::RwLock` and decide
// when to invalidate. Stale entries linger until read or `purge_stale`.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Key/value cache with a fixed time-to-live per entry
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Fresh value for `key`, or None when missing or stale
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| !Self::is_stale(entry.stored_at, self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry whose key fails the predicate
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.entries.retain(|key, _| keep(key));
    }

    /// Remove stale entries, returning how many were dropped
    pub fn purge_stale(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| !Self::is_stale(entry.stored_at, ttl));
        before - self.entries.len()
    }

    fn is_stale(stored_at: Instant, ttl: Duration) -> bool {
        stored_at.elapsed() > ttl
    }
}
