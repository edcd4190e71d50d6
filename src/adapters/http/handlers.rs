//! API request handlers

use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::domain::PoolListing;
use super::form::read_token_form;
use super::responses::{ApiError, CreateTokenResponse, HealthResponse};
use super::AppState;

/// Query/body carrying the configuration to list
#[derive(Debug, Default, Deserialize)]
pub struct PoolsQuery {
    pub config: Option<String>,
}

/// List pools, `GET /api/pools?config=`
pub async fn list_pools_query(
    State(state): State<AppState>,
    Query(query): Query<PoolsQuery>,
) -> Response {
    pools_response(&state, query.config).await
}

/// List pools, `POST /api/pools` with `{config}`.
///
/// An empty body is a missing config; an unreadable one is rejected as such.
pub async fn list_pools_body(State(state): State<AppState>, body: Bytes) -> Response {
    if body.iter().all(u8::is_ascii_whitespace) {
        return pools_response(&state, None).await;
    }

    match serde_json::from_slice::<PoolsQuery>(&body) {
        Ok(query) => pools_response(&state, query.config).await,
        Err(e) => {
            tracing::debug!("Unreadable pools request body: {}", e);
            let listing = PoolListing::failed(None, format!("Invalid request body: {}", e));
            (StatusCode::BAD_REQUEST, Json(listing)).into_response()
        }
    }
}

async fn pools_response(state: &AppState, config: Option<String>) -> Response {
    match state.pool_query.list_pools(config.as_deref()).await {
        Ok(listing) => {
            let status = if listing.success {
                StatusCode::OK
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(listing)).into_response()
        }
        Err(e) => {
            let config = config.filter(|c| !c.trim().is_empty());
            (StatusCode::BAD_REQUEST, Json(PoolListing::failed(config, e.to_string()))).into_response()
        }
    }
}

/// Create a token, `POST /api` with JSON or multipart
pub async fn create_token(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<CreateTokenResponse>, ApiError> {
    let form = read_token_form(request).await?;
    let outcome = state.orchestrator.create_token(form).await?;
    tracing::info!(
        "Token {} accepted under config {}",
        outcome.token_data.symbol,
        outcome.config_address
    );
    Ok(Json(outcome.into()))
}

/// `GET /api`
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
