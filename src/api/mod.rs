//! HTTP service: Axum JSON API over the prediction engine.
//!
//! Stateless apart from the immutable configuration shared through
//! `Arc<ServiceState>`. CORS enabled for local tooling.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::{AppState, ServiceState};

/// Bind `port` and serve until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    info!(port, "Scorecast API listening on http://localhost:{port}");

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/predict", post(routes::predict))
        .route("/api/margin", post(routes::margin))
        .route("/api/expected-value", post(routes::expected_value))
        .route("/api/config", get(routes::get_config))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
