//! Rate Limiter
//!
//! Single-flight pacing gate for an upstream with a request ceiling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::error::{CacheError, Result};

// == Limiter Stats ==
/// Dispatch counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LimiterStats {
    /// Calls let through
    pub dispatched: u64,
    /// Calls that had to wait before being let through
    pub delayed: u64,
    /// Configured spacing in milliseconds
    pub min_interval_ms: u64,
}

// == Rate Limiter ==
/// Spaces dispatches at least `min_interval` apart across all callers.
///
/// The last-dispatch timestamp lives behind a tokio mutex that is held while a caller
/// waits out the remaining interval, so check, wait and record happen as one step and
/// waiters are released one at a time in FIFO order. A caller dropped mid-wait
/// releases the mutex without recording anything, leaving the slot to the next waiter.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
    dispatched: AtomicU64,
    delayed: AtomicU64,
}

impl RateLimiter {
    // == Constructor ==
    pub fn new(min_interval: Duration) -> Result<Self> {
        if min_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "min_interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            min_interval,
            last_dispatch: Mutex::new(None),
            dispatched: AtomicU64::new(0),
            delayed: AtomicU64::new(0),
        })
    }

    /// Builds a limiter from a requests-per-second ceiling.
    pub fn per_second(requests_per_second: f64) -> Result<Self> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(CacheError::InvalidConfig(format!(
                "requests_per_second must be a positive number, got {}",
                requests_per_second
            )));
        }

        let interval = Duration::try_from_secs_f64(1.0 / requests_per_second)
            .map_err(|e| CacheError::InvalidConfig(e.to_string()))?;
        Self::new(interval)
    }

    // == Acquire ==
    /// Waits until a dispatch is allowed, then records it.
    ///
    /// Never fails. Callers needing bounded latency wrap this in `tokio::time::timeout`.
    pub async fn acquire(&self) {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "Rate limiting: waiting"
                );
                sleep_until(ready_at).await;
                self.delayed.fetch_add(1, Ordering::Relaxed);
            }
        }

        *last = Some(Instant::now());
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            delayed: self.delayed.load(Ordering::Relaxed),
            min_interval_ms: self.min_interval.as_millis() as u64,
        }
    }
}
