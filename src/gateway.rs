//! Upstream Gateway
//!
//! The cache-then-fetch flow every upstream-calling collaborator follows:
//! look up `(namespace, fingerprint)`, on a miss pass the rate limiter if the
//! upstream needs it, run the call, then store the result with the namespace TTL.
//!
//! Concurrent misses on the same key are collapsed: one task calls upstream while the
//! others wait for it and are served from the cache afterwards.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::cache::{CacheKey, Namespace, TtlCache};
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::limiter::RateLimiter;

type Flights = Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>;

// == Gateway ==
/// Shared cache plus the limiter guarding the throttled upstream.
#[derive(Debug, Clone)]
pub struct Gateway<V> {
    cache: TtlCache<V>,
    limiter: Arc<RateLimiter>,
    /// One slot per key with an upstream call in progress
    flights: Flights,
}

impl<V: Clone> Gateway<V> {
    pub fn new(cache: TtlCache<V>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            cache,
            limiter,
            flights: Arc::default(),
        }
    }

    /// Builds the process-wide cache and limiter from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = TtlCache::new(config.max_entries)?;
        let limiter = RateLimiter::new(config.min_interval())?;
        Ok(Self::new(cache, Arc::new(limiter)))
    }

    pub fn cache(&self) -> &TtlCache<V> {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Number of keys with a fetch currently in progress or waiting.
    pub fn in_flight(&self) -> usize {
        lock_flights(&self.flights).len()
    }

    // == Fetch ==
    /// Returns the cached value for a known namespace, or fetches and caches it.
    ///
    /// TTL and pacing follow [`Namespace::ttl`] and [`Namespace::is_rate_limited`].
    pub async fn fetch<F, Fut>(
        &self,
        namespace: Namespace,
        fingerprint: &str,
        call: F,
    ) -> std::result::Result<V, GatewayError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        self.fetch_with(
            namespace.as_str(),
            fingerprint,
            namespace.ttl(),
            namespace.is_rate_limited(),
            call,
        )
        .await
    }

    /// Same flow with an explicit namespace, TTL and pacing choice.
    ///
    /// Failed calls are not cached, so the next request retries upstream. A task that
    /// waited on a concurrent fetch of the same key retries on its own if that fetch
    /// failed.
    pub async fn fetch_with<F, Fut>(
        &self,
        namespace: &str,
        fingerprint: &str,
        ttl: Duration,
        rate_limited: bool,
        call: F,
    ) -> std::result::Result<V, GatewayError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        if let Some(value) = self.cache.get(namespace, fingerprint)? {
            return Ok(value);
        }

        let key = CacheKey::new(namespace, fingerprint)?;
        let _flight = self.join_flight(&key).await;

        // Filled in by the fetch we waited on
        if let Some(value) = self.cache.peek(namespace, fingerprint)? {
            debug!(key = %key.short(), "Served by concurrent fetch");
            return Ok(value);
        }

        if rate_limited {
            self.limiter.acquire().await;
        }

        debug!(namespace, "Calling upstream");
        let value = call().await.map_err(GatewayError::Upstream)?;
        self.cache.set(namespace, fingerprint, value.clone(), ttl)?;

        Ok(value)
    }

    /// Waits until no other task is fetching `key`, then holds the key until dropped.
    async fn join_flight(&self, key: &CacheKey) -> FlightGuard {
        let slot = {
            let mut flights = lock_flights(&self.flights);
            Arc::clone(flights.entry(key.clone()).or_default())
        };

        FlightGuard {
            flights: Arc::clone(&self.flights),
            key: key.clone(),
            guard: Some(slot.lock_owned().await),
        }
    }
}

// == Flight Guard ==
/// Exclusive hold on one key's upstream fetch.
///
/// Removes the key's slot on drop when no other task holds or waits on it.
struct FlightGuard {
    flights: Flights,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };

        let mut flights = lock_flights(&self.flights);
        // Referenced only by the map and this guard
        if Arc::strong_count(OwnedMutexGuard::mutex(&guard)) == 2 {
            flights.remove(&self.key);
        }
        drop(guard);
    }
}

fn lock_flights(flights: &Flights) -> MutexGuard<'_, HashMap<CacheKey, Arc<AsyncMutex<()>>>> {
    flights
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
