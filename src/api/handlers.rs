//! API Handlers
//!
//! HTTP request handlers for the observability and admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{
    ClearResponse, HealthResponse, InvalidateResponse, StatsResponse, SweepResponse,
};

/// Application state shared across all handlers.
///
/// Holds the process-wide gateway; cloning shares the same cache and limiter.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway<Value>,
}

impl AppState {
    pub fn new(gateway: Gateway<Value>) -> Self {
        Self { gateway }
    }

    /// Builds the cache and limiter from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Gateway::from_config(config)?))
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.gateway.cache().stats(),
        state.gateway.limiter().stats(),
    ))
}

/// Handler for POST /sweep
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let cache = state.gateway.cache();
    let removed = cache.sweep();

    Json(SweepResponse {
        removed,
        size: cache.len(),
    })
}

/// Handler for DELETE /cache/:namespace/:fingerprint
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path((namespace, fingerprint)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.gateway.cache().invalidate(&namespace, &fingerprint)?;

    Ok(Json(InvalidateResponse {
        namespace,
        fingerprint,
        removed,
    }))
}

/// Handler for DELETE /cache/:namespace
pub async fn clear_namespace_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<ClearResponse>> {
    let removed = state.gateway.cache().clear_namespace(&namespace)?;

    Ok(Json(ClearResponse { namespace, removed }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
