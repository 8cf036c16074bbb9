//! Cache Module
//!
//! Provides in-memory caching with namespaces, TTL expiration and LRU eviction.

mod digest;
mod entry;
mod key;
mod lru;
mod namespace;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use digest::{fingerprint, normalize_text};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruTracker;
pub use namespace::{Namespace, GEOCODE_TTL, POI_TTL, ROUTE_TTL, TRANSIT_TTL};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_cache::TtlCache;

// == Public Constants ==
/// Maximum allowed namespace length in bytes
pub const MAX_NAMESPACE_LENGTH: usize = 64;

/// Default capacity when none is configured
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
