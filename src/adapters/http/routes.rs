//! API route definitions

use super::{handlers::*, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Pool listing routes
pub fn create_pool_routes() -> Router<AppState> {
    Router::new().route("/api/pools", get(list_pools_query).post(list_pools_body))
}

/// Token creation routes
pub fn create_token_routes() -> Router<AppState> {
    Router::new().route("/api", post(create_token).get(method_not_allowed))
}
