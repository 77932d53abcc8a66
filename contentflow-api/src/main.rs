//! # ContentFlow API Server
//!
//! Multi-tenant content-production backend: admins assign social-media
//! content to creators, creators produce and revise it, customers approve
//! or reject it, and approved items land on per-customer calendars.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p contentflow-api
//! ```

use std::sync::Arc;

use contentflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use contentflow_shared::store::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contentflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "ContentFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    // In-memory document store; swap for a durable DocumentStore
    // implementation when one is wired up.
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
