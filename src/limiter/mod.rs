//! Limiter Module
//!
//! Client-side pacing for upstreams whose usage policy caps request frequency.

mod rate_limiter;

pub use rate_limiter::{LimiterStats, RateLimiter};

/// The geocoding upstream allows at most one request per second.
pub const GEOCODE_REQUESTS_PER_SECOND: f64 = 1.0;
