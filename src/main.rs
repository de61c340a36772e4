use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod device;
mod model;
mod store;

use auth::service::AuthService;
use auth::AppState;
use config::AppConfig;
use store::RocksStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Configuration (read once, immutable afterwards)
    // -----------------------------
    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(?config, "configuration loaded");

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let store = Arc::new(RocksStore::open(&config.db_path)?);
    let auth = Arc::new(AuthService::new(store, config.clone()));

    let state = AppState { auth };

    // -----------------------------
    // Router
    // -----------------------------
    let app = Router::new()
        .merge(auth::router())
        // CORS for frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    let addr = config.bind_addr.clone();
    println!("🌐 Auth server listening on http://{addr}");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
