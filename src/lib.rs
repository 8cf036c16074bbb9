//! geo_gate - Upstream cache and rate-limit gate for geospatial API calls
//!
//! Provides a namespaced TTL cache with LRU eviction and a pacing gate for upstreams
//! with a strict request ceiling, shared by every upstream-calling collaborator.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Namespace, TtlCache};
pub use config::Config;
pub use error::{CacheError, GatewayError};
pub use gateway::Gateway;
pub use limiter::RateLimiter;
pub use tasks::spawn_sweep_task;
