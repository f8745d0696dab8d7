//! Application assembly: state wiring, router, server loop.

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use medibook_core::config::AppConfig;
use medibook_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the Axum application from configuration and a database pool.
pub fn build_app(config: AppConfig, db_pool: PgPool) -> Router {
    let state = AppState::build(config, db_pool);
    build_router(state)
}

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(config, db_pool);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(
            medibook_core::ErrorKind::Internal,
            format!("Failed to bind {addr}"),
            e,
        ))?;

    info!(addr = %addr, "MediBook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(
            medibook_core::ErrorKind::Internal,
            "Server error",
            e,
        ))?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
