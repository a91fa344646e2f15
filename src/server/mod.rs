//! HTTP interface over the [`NearBite`] facade.

pub mod error;
pub mod routes;

use crate::domain::error::DomainError;
use crate::NearBite;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(app: Arc<NearBite>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/info", get(routes::info))
        .route("/recommend", get(routes::recommend))
        .route("/chat", get(routes::chat))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(app: Arc<NearBite>, bind: &str) -> Result<(), DomainError> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| DomainError::Config(format!("Invalid bind address {bind}: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let info = app.info();
    tracing::info!(%addr, mode = %info.mode, model = %info.embedding_model, "Starting NearBite server");

    axum::serve(listener, build_router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
