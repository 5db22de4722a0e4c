use std::sync::Arc;

use anyhow::Result;
use liftlog_core::AppConfig;
use liftlog_http::{AppState, create_router};
use liftlog_storage::StorageBackend;

pub(crate) async fn run(config: AppConfig) -> Result<()> {
    let storage = Arc::new(StorageBackend::from_config(&config).await?);
    tracing::info!(backend = storage.kind(), "Storage ready");

    let state = Arc::new(AppState::new(storage, config.clone()));
    let seeded = state.exercise_service.seed_builtin().await?;
    tracing::info!(count = seeded, "Built-in exercise catalog loaded");

    let router = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
