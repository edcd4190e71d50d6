//! REST API for listing pools and launching tokens

mod form;
mod handlers;
mod responses;
mod routes;

pub use responses::{ApiError, CreateTokenResponse, ErrorResponse, HealthResponse};
pub use routes::*;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::application::{PoolQueryAdapter, TokenCreationOrchestrator};

/// Largest accepted request body (multipart image uploads included)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared API state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TokenCreationOrchestrator>,
    pub pool_query: Arc<PoolQueryAdapter>,
}

impl AppState {
    pub fn new(orchestrator: Arc<TokenCreationOrchestrator>, pool_query: Arc<PoolQueryAdapter>) -> Self {
        Self {
            orchestrator,
            pool_query,
        }
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(create_pool_routes())
        .merge(create_token_routes())
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}

/// Serve the API until the listener fails
pub async fn start_server(state: AppState, bind_address: &str) -> Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind(bind_address).await?;
    info!("API server listening on {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
