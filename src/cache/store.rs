//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.
//! The store itself is single-threaded; [`crate::cache::TtlCache`] wraps it in a lock.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// LRU access tracker, always holds exactly the keys of `entries`
    lru: LruTracker<CacheKey>,
    /// Entries ordered by expiry, always holds exactly the keys of `entries`
    expiry: BTreeSet<(Instant, CacheKey)>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expiry: BTreeSet::new(),
            stats: CacheStats::new(max_entries),
            max_entries,
        })
    }

    // == Set ==
    /// Stores a value that expires `ttl` from now.
    ///
    /// Overwriting an existing key replaces the value and resets its TTL without
    /// counting against capacity. Inserting a new key into a full store first reclaims
    /// expired entries, and only evicts least recently used entries if that was not
    /// enough.
    pub fn set(&mut self, key: CacheKey, value: V, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "ttl must be greater than zero".to_string(),
            ));
        }
        let now = Instant::now();
        if now.checked_add(ttl).is_none() {
            return Err(CacheError::InvalidConfig(format!("ttl {:?} is too large", ttl)));
        }

        if let Some(old) = self.entries.get(&key) {
            self.expiry.remove(&(old.expires_at, key.clone()));
        } else {
            if self.entries.len() >= self.max_entries {
                self.drop_expired(now);
            }
            while self.entries.len() >= self.max_entries {
                let Some(evicted) = self.lru.evict_oldest() else {
                    break;
                };
                if let Some(entry) = self.entries.remove(&evicted) {
                    self.expiry.remove(&(entry.expires_at, evicted.clone()));
                }
                self.stats.record_eviction();
                debug!(key = %evicted.short(), "Evicted LRU entry");
            }
        }

        let entry = CacheEntry::new(value, ttl, now);
        self.expiry.insert((entry.expires_at, key.clone()));
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_size(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a live value, refreshing its recency.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    /// Returns a live value without affecting recency or counters.
    pub fn peek(&self, key: &CacheKey) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Invalidate ==
    /// Removes an entry, returning whether one was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.remove_entry(key)
    }

    // == Sweep ==
    /// Removes all expired entries, returning how many were dropped.
    ///
    /// Does not touch recency of the surviving entries.
    pub fn sweep(&mut self) -> usize {
        self.drop_expired(Instant::now())
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.expiry.clear();
        self.stats.set_size(0);
        count
    }

    /// Removes every entry of one namespace.
    pub fn clear_namespace(&mut self, namespace: &str) -> usize {
        let keys: Vec<CacheKey> = self
            .entries
            .keys()
            .filter(|key| key.namespace() == namespace)
            .cloned()
            .collect();

        for key in &keys {
            self.remove_entry(key);
        }
        keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    /// Whether a live entry exists, without affecting recency or counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn remove_entry(&mut self, key: &CacheKey) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        self.expiry.remove(&(entry.expires_at, key.clone()));
        self.lru.remove(key);
        self.stats.set_size(self.entries.len());
        true
    }

    /// Drops every entry expired at `now`, earliest first, counting them as expirations.
    fn drop_expired(&mut self, now: Instant) -> usize {
        let mut dropped = 0;
        while let Some((expires_at, _)) = self.expiry.first() {
            if *expires_at > now {
                break;
            }
            let Some((_, key)) = self.expiry.pop_first() else {
                break;
            };
            self.entries.remove(&key);
            self.lru.remove(&key);
            dropped += 1;
        }

        if dropped > 0 {
            self.stats.record_expirations(dropped);
            self.stats.set_size(self.entries.len());
            debug!(count = dropped, "Dropped expired entries");
        }
        dropped
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const MINUTE: Duration = Duration::from_secs(60);

    fn key(ns: &str, fp: &str) -> CacheKey {
        CacheKey::new(ns, fp).unwrap()
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        assert!(matches!(
            CacheStore::<u32>::new(0),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100).unwrap();

        store.set(key("poi", "a"), "value1", MINUTE).unwrap();

        assert_eq!(store.get(&key("poi", "a")), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<u32> = CacheStore::new(100).unwrap();
        assert_eq!(store.get(&key("poi", "missing")), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_rejects_zero_and_huge_ttl() {
        let mut store = CacheStore::new(10).unwrap();
        assert!(store.set(key("poi", "a"), 1, Duration::ZERO).is_err());
        assert!(store.set(key("poi", "a"), 1, Duration::MAX).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_peek_leaves_counters_alone() {
        let mut store = CacheStore::new(2).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store.set(key("poi", "b"), 2, MINUTE).unwrap();

        assert_eq!(store.peek(&key("poi", "a")), Some(1));
        assert_eq!(store.peek(&key("poi", "zz")), None);
        let stats = store.stats();
        assert_eq!(stats.hits + stats.misses, 0);

        // Peeking did not refresh `a`, so it is still the eviction victim
        store.set(key("poi", "c"), 3, MINUTE).unwrap();
        assert!(!store.contains(&key("poi", "a")));
    }

    #[test]
    fn test_store_invalidate() {
        let mut store = CacheStore::new(100).unwrap();

        store.set(key("route", "a"), 1, MINUTE).unwrap();

        assert!(store.invalidate(&key("route", "a")));
        assert!(!store.invalidate(&key("route", "a")));
        assert!(store.is_empty());
        assert_eq!(store.get(&key("route", "a")), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(2).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store.set(key("poi", "b"), 2, MINUTE).unwrap();
        store.set(key("poi", "a"), 3, MINUTE).unwrap();

        assert_eq!(store.get(&key("poi", "a")), Some(3));
        assert_eq!(store.get(&key("poi", "b")), Some(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100).unwrap();

        store
            .set(key("transit", "a"), 1, Duration::from_millis(50))
            .unwrap();
        assert_eq!(store.get(&key("transit", "a")), Some(1));

        sleep(Duration::from_millis(80));

        assert_eq!(store.get(&key("transit", "a")), None);
        // Lazily removed on the failed lookup
        assert!(store.is_empty());
        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_namespace_isolation() {
        let mut store = CacheStore::new(100).unwrap();

        store.set(key("ns1", "k"), "v1", MINUTE).unwrap();

        assert_eq!(store.get(&key("ns2", "k")), None);
        assert_eq!(store.get(&key("ns1", "k")), Some("v1"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3).unwrap();

        store.set(key("poi", "k1"), 1, MINUTE).unwrap();
        store.set(key("poi", "k2"), 2, MINUTE).unwrap();
        store.set(key("poi", "k3"), 3, MINUTE).unwrap();
        store.set(key("poi", "k4"), 4, MINUTE).unwrap();

        assert_eq!(store.len(), 3);
        assert!(!store.contains(&key("poi", "k1")));
        assert!(store.contains(&key("poi", "k2")));
        assert!(store.contains(&key("poi", "k4")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_refresh_on_get() {
        // maxEntries=2: set a, set b, get a, set c -> b evicted
        let mut store = CacheStore::new(2).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store.set(key("poi", "b"), 2, MINUTE).unwrap();
        assert_eq!(store.get(&key("poi", "a")), Some(1));
        store.set(key("poi", "c"), 3, MINUTE).unwrap();

        assert!(store.contains(&key("poi", "a")));
        assert!(!store.contains(&key("poi", "b")));
        assert!(store.contains(&key("poi", "c")));
    }

    #[test]
    fn test_store_sweep() {
        let mut store = CacheStore::new(100).unwrap();

        store.set(key("route", "short"), 1, Duration::from_millis(30)).unwrap();
        store.set(key("route", "long"), 2, MINUTE).unwrap();

        sleep(Duration::from_millis(60));

        assert_eq!(store.sweep(), 1);
        assert_eq!(store.len(), 1);
        let stats = store.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(store.get(&key("route", "long")), Some(2));
    }

    #[test]
    fn test_store_clear_namespace() {
        let mut store = CacheStore::new(100).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store.set(key("poi", "b"), 2, MINUTE).unwrap();
        store.set(key("geocode", "a"), 3, MINUTE).unwrap();

        assert_eq!(store.clear_namespace("poi"), 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&key("geocode", "a")));

        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn test_full_store_reclaims_expired_before_evicting_live() {
        let mut store = CacheStore::new(2).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store
            .set(key("transit", "b"), 2, Duration::from_millis(20))
            .unwrap();
        // `a` is now the least recently used entry, `b` is stale
        assert_eq!(store.get(&key("transit", "b")), Some(2));
        sleep(Duration::from_millis(40));

        store.set(key("poi", "c"), 3, MINUTE).unwrap();

        assert!(store.contains(&key("poi", "a")));
        assert!(store.contains(&key("poi", "c")));
        assert_eq!(store.len(), 2);
        let stats = store.stats();
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_overwrite_moves_expiry_forward() {
        let mut store = CacheStore::new(10).unwrap();

        store
            .set(key("route", "a"), 1, Duration::from_millis(20))
            .unwrap();
        store.set(key("route", "a"), 2, MINUTE).unwrap();
        sleep(Duration::from_millis(40));

        assert_eq!(store.sweep(), 0);
        assert_eq!(store.get(&key("route", "a")), Some(2));
    }

    #[test]
    fn test_eviction_skips_cleared_keys() {
        let mut store = CacheStore::new(2).unwrap();

        store.set(key("poi", "a"), 1, MINUTE).unwrap();
        store.set(key("poi", "b"), 2, MINUTE).unwrap();
        store.invalidate(&key("poi", "a"));
        store.set(key("poi", "c"), 3, MINUTE).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
    }
}
