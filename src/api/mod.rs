//! API Module
//!
//! HTTP handlers and routing for the observability and admin API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache and rate limiter statistics
//! - `POST /sweep` - Run an expiry sweep
//! - `DELETE /cache/:namespace` - Clear a namespace
//! - `DELETE /cache/:namespace/:fingerprint` - Invalidate one entry

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
