//! A fixed-TTL map with a hard size cap.
//!
//! The cache is clock-agnostic: every call takes `now` so callers (and tests)
//! control time. It does no locking of its own; the API wraps it in an async
//! `RwLock`.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    /// Return a clone of the cached value if it is younger than the TTL.
    pub fn get(&self, key: &K, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace a value. When full, expired entries are purged
    /// first; if that frees nothing the whole map is cleared.
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.purge_expired(now);
            if self.entries.len() >= self.max_entries {
                self.entries.clear();
            }
        }
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Drop every entry older than the TTL. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn fresh_entries_are_returned() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 8);
        cache.insert("a", 1, now);
        assert_eq!(cache.get(&"a", now + Duration::from_secs(59)), Some(1));
    }

    #[test]
    fn expired_entries_are_misses() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 8);
        cache.insert("a", 1, now);
        assert_eq!(cache.get(&"a", now + TTL), None);
    }

    #[test]
    fn reinsert_refreshes_timestamp() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 8);
        cache.insert("a", 1, now);
        cache.insert("a", 2, now + Duration::from_secs(50));
        assert_eq!(cache.get(&"a", now + Duration::from_secs(100)), Some(2));
    }

    #[test]
    fn overflow_purges_expired_first() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 2);
        cache.insert("old", 1, now);
        cache.insert("new", 2, now + Duration::from_secs(30));
        cache.insert("newest", 3, now + Duration::from_secs(61));

        assert_eq!(cache.len(), 2);
        let later = now + Duration::from_secs(62);
        assert_eq!(cache.get(&"new", later), Some(2));
        assert_eq!(cache.get(&"newest", later), Some(3));
    }

    #[test]
    fn overflow_clears_when_nothing_expired() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 2);
        cache.insert("a", 1, now);
        cache.insert("b", 2, now);
        cache.insert("c", 3, now);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"c", now), Some(3));
    }

    #[test]
    fn purge_reports_removed_count() {
        let now = Instant::now();
        let mut cache = TtlCache::new(TTL, 8);
        cache.insert("a", 1, now);
        cache.insert("b", 2, now + Duration::from_secs(30));
        assert_eq!(cache.purge_expired(now + Duration::from_secs(70)), 1);
        assert!(!cache.is_empty());
    }
}
