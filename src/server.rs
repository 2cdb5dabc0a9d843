// ABOUTME: Router assembly and HTTP server lifecycle for the chat server
// ABOUTME: Merges domain routes, applies tracing and CORS layers, serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::{pending, Future};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{ChatRoutes, HealthRoutes, ShareRoutes};

/// Build the full application router
pub fn app_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(ShareRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve the application on an already-bound listener until `shutdown` resolves
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections
pub async fn serve<F>(
    listener: TcpListener,
    resources: Arc<ServerResources>,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = app_router(resources);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))
}

/// Bind the configured address and serve until Ctrl+C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = format!("{}:{}", resources.config.host, resources.config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind {addr}: {e}")))?;
    let local: Option<SocketAddr> = listener.local_addr().ok();

    info!(address = ?local, "HTTP server listening");
    serve(listener, resources, shutdown_signal()).await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Resolve on Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal, serving until killed");
        pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
