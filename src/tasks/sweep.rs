//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, bounding memory
//! held by keys that are never looked up again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a background task that sweeps `cache` every `interval`.
///
/// The task runs until aborted through the returned handle, which the lifecycle owner
/// does on shutdown. Each sweep holds the cache lock only for the duration of one
/// pass over the map.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::<serde_json::Value>::new(1000)?;
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V>(cache: TtlCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            "Starting TTL sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep();

            if removed > 0 {
                info!(removed, size = cache.len(), "TTL sweep removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
