//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use pillscan_core::ScanPipeline;

use crate::{extract, health_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: ScanPipeline,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(pipeline: ScanPipeline) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
        }
    }
}

/// Router-level settings taken from the server config.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub cors: bool,
    pub max_upload_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors: true,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

pub fn build_router(state: GatewayState, options: RouterOptions) -> Router {
    let mut app = Router::new()
        .route("/", get(health_api::liveness))
        .route("/extract_text", post(extract::extract_text))
        .route("/api/health", get(health_api::get_health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if options.cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

/// Serve the gateway until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(
    addr: SocketAddr,
    state: GatewayState,
    options: RouterOptions,
) -> Result<()> {
    let app = build_router(state, options);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
