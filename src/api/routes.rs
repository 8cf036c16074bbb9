//! API Routes
//!
//! Configures the Axum router with the observability and admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_namespace_handler, health_handler, invalidate_handler, stats_handler,
    sweep_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /stats` - Cache and rate limiter counters
/// - `POST /sweep` - Drop expired entries now
/// - `DELETE /cache/:namespace` - Drop every entry of a namespace
/// - `DELETE /cache/:namespace/:fingerprint` - Drop one entry
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/sweep", post(sweep_handler))
        .route("/cache/:namespace", delete(clear_namespace_handler))
        .route("/cache/:namespace/:fingerprint", delete(invalidate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
