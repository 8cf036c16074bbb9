//! Shared TTL Cache Handle
//!
//! Thread-safe, cheaply cloneable front to a [`CacheStore`]. One instance is built at
//! startup and every collaborator holds a clone of it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStats, CacheStore};
use crate::error::Result;

// == TTL Cache ==
/// Namespaced, expiring, capacity-bounded cache shared across tasks.
///
/// All operations take a single mutex for their whole duration, so map contents, LRU
/// bookkeeping and counters always change together. No operation suspends.
pub struct TtlCache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Result<Self> {
        let store = CacheStore::new(max_entries)?;
        info!(max_entries, "Initialized TTL cache");
        Ok(Self {
            inner: Arc::new(Mutex::new(store)),
        })
    }

    // == Get ==
    /// Looks up a live value. `Ok(None)` is a miss.
    pub fn get(&self, namespace: impl AsRef<str>, fingerprint: &str) -> Result<Option<V>> {
        let key = CacheKey::new(namespace.as_ref(), fingerprint)?;
        let value = self.lock().get(&key);

        if value.is_some() {
            debug!(key = %key.short(), "Cache hit");
        } else {
            debug!(key = %key.short(), "Cache miss");
        }
        Ok(value)
    }

    /// Looks up a live value without counting a hit or miss or refreshing recency.
    pub fn peek(&self, namespace: impl AsRef<str>, fingerprint: &str) -> Result<Option<V>> {
        let key = CacheKey::new(namespace.as_ref(), fingerprint)?;
        Ok(self.lock().peek(&key))
    }

    // == Set ==
    /// Inserts or overwrites a value that expires after `ttl`.
    pub fn set(
        &self,
        namespace: impl AsRef<str>,
        fingerprint: &str,
        value: V,
        ttl: Duration,
    ) -> Result<()> {
        let key = CacheKey::new(namespace.as_ref(), fingerprint)?;
        let size = {
            let mut store = self.lock();
            store.set(key.clone(), value, ttl)?;
            store.len()
        };

        debug!(key = %key.short(), ttl_secs = ttl.as_secs(), size, "Cache set");
        Ok(())
    }

    // == Invalidate ==
    /// Removes an entry if present. Returns whether anything was removed.
    pub fn invalidate(&self, namespace: impl AsRef<str>, fingerprint: &str) -> Result<bool> {
        let key = CacheKey::new(namespace.as_ref(), fingerprint)?;
        Ok(self.lock().invalidate(&key))
    }

    // == Sweep ==
    /// Drops every expired entry, returning the number removed.
    pub fn sweep(&self) -> usize {
        self.lock().sweep()
    }

    // == Clear ==
    pub fn clear(&self) -> usize {
        let count = self.lock().clear();
        info!(count, "Cleared all cache entries");
        count
    }

    /// Drops every entry of one namespace.
    pub fn clear_namespace(&self, namespace: impl AsRef<str>) -> Result<usize> {
        // Validates the namespace the same way key operations do
        let key = CacheKey::new(namespace.as_ref(), "")?;
        let count = self.lock().clear_namespace(key.namespace());
        if count > 0 {
            info!(count, namespace = key.namespace(), "Cleared cache namespace");
        }
        Ok(count)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn contains(&self, namespace: impl AsRef<str>, fingerprint: &str) -> Result<bool> {
        let key = CacheKey::new(namespace.as_ref(), fingerprint)?;
        Ok(self.lock().contains(&key))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore<V>> {
        // Every store method leaves the map and LRU consistent before it can panic
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Namespace;
    use crate::error::CacheError;
    use std::thread;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_get_set_with_namespace_enum() {
        let cache = TtlCache::new(10).unwrap();

        cache.set(Namespace::Poi, "a", 1, MINUTE).unwrap();

        assert_eq!(cache.get(Namespace::Poi, "a").unwrap(), Some(1));
        assert_eq!(cache.get("poi", "a").unwrap(), Some(1));
        assert_eq!(cache.get(Namespace::Route, "a").unwrap(), None);
    }

    #[test]
    fn test_empty_namespace_fails_fast() {
        let cache: TtlCache<u32> = TtlCache::new(10).unwrap();

        assert!(matches!(cache.get("", "a"), Err(CacheError::InvalidKey(_))));
        assert!(matches!(
            cache.set("", "a", 1, MINUTE),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(cache.invalidate("", "a").is_err());
        assert!(cache.clear_namespace("").is_err());

        // Rejected calls are not counted as lookups
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let cache = TtlCache::new(10).unwrap();
        let other = cache.clone();

        cache.set("geocode", "berlin", "52.52,13.40", MINUTE).unwrap();

        assert_eq!(other.get("geocode", "berlin").unwrap(), Some("52.52,13.40"));
        assert_eq!(other.stats().hits, 1);
    }

    #[test]
    fn test_invalidate_absent_is_ok() {
        let cache: TtlCache<u32> = TtlCache::new(10).unwrap();
        assert!(!cache.invalidate("route", "nope").unwrap());
    }

    #[test]
    fn test_concurrent_threads_respect_capacity() {
        let cache = TtlCache::new(64).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let fp = format!("{}-{}", t, i);
                        cache.set("poi", &fp, i, MINUTE).unwrap();
                        let _ = cache.get("poi", &fp).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.size, 64);
        assert_eq!(stats.evictions, 8 * 200 - 64);
        assert_eq!(stats.hits + stats.misses, 8 * 200);
    }
}
