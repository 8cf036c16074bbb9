//! Error types for the cache and rate-limit gate
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Configuration-class errors raised by the cache, the limiter and config loading.
///
/// Capacity pressure and expiry are never errors; they surface as evictions and misses.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid construction parameter (capacity, interval, TTL)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed cache key (e.g. empty namespace)
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Request parameters could not be serialized into a fingerprint
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// == Gateway Error Enum ==
/// Errors surfaced by [`crate::gateway::Gateway::fetch`].
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The cache rejected the key or TTL
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The upstream call itself failed
    #[error("Upstream call failed: {0}")]
    Upstream(#[source] anyhow::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) | CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
