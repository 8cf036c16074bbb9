//! geo_gate - Upstream cache and rate-limit gate for geospatial API calls
//!
//! Runs the shared cache, the rate limiter and the observability HTTP API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geo_gate::{api::create_router, config::LogFormat, spawn_sweep_task, AppState, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Load and validate configuration from environment variables
/// 2. Initialize tracing subscriber in the configured format
/// 3. Create the shared cache and rate limiter
/// 4. Start background TTL sweep task
/// 5. Serve the observability API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    init_tracing(config.log_format);

    info!("Starting geo_gate");
    info!(
        max_entries = config.max_entries,
        sweep_interval_secs = config.sweep_interval,
        min_interval_ms = config.min_interval_ms,
        port = config.server_port,
        log_format = ?config.log_format,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).context("failed to build cache")?;

    let sweep_handle = spawn_sweep_task(state.gateway.cache().clone(), config.sweep_period());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber.
///
/// Defaults to "info" level, can be overridden with RUST_LOG env var.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "geo_gate=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep task.
///
/// The cache is dropped with the process; nothing is persisted.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
