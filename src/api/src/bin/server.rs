//! Palisade API server

use palisade_api::store::InMemoryStore;
use palisade_api::{build_router, ApiConfig, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,palisade_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ApiConfig::from_env();
    let bind_addr = config.bind_address();

    // Seed the demo dataset and build the router
    let store = Arc::new(InMemoryStore::new());
    store.seed().await;
    let app = build_router(AppState::new(store));

    tracing::info!("Palisade API server");
    tracing::info!("Listening on http://{}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
