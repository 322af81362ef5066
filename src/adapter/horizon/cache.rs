//! In-memory lookup caches owned by the Horizon client.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Thread-safe key/value cache with an optional time-to-live.
///
/// With `ttl = None` entries live for the lifetime of the cache.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries expire `ttl` after they were fetched.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Create a cache whose entries never expire.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Get a cached value if present and not expired.
    ///
    /// An expired entry is evicted on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if !self.is_expired(entry) {
                return Some(entry.value.clone());
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| self.is_expired(entry)) {
            entries.remove(key);
        }
        None
    }

    /// Insert or replace a value, stamping it with the current time.
    pub fn put(&self, key: K, value: V) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Remove expired entries.
    pub fn clear_expired(&self) {
        let Some(ttl) = self.ttl else {
            return;
        };
        self.entries
            .write()
            .retain(|_, entry| entry.fetched_at.elapsed() <= ttl);
    }

    /// Number of entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.fetched_at.elapsed() > ttl)
    }
}
