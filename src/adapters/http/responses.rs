//! API response types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{CreateTokenOutcome, OrchestratorError};
use crate::domain::{TokenSummary, ValidationError};

/// Response for a successful creation request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    pub success: bool,
    pub message: String,
    pub token_data: TokenSummary,
    pub config_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_mint: Option<String>,
}

impl From<CreateTokenOutcome> for CreateTokenResponse {
    fn from(outcome: CreateTokenOutcome) -> Self {
        let message = match outcome.pool {
            Some(_) => "Pool transaction prepared, sign it to launch the token",
            None => "Token data received successfully",
        };
        let (transaction, base_mint) = match outcome.pool {
            Some(pool) => (Some(pool.transaction), Some(pool.base_mint.to_string())),
            None => (None, None),
        };

        Self {
            success: true,
            message: message.to_string(),
            token_data: outcome.token_data,
            config_address: outcome.config_address.to_string(),
            transaction,
            base_mint,
        }
    }
}

/// Body of every error response outside the pool listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Handler errors, rendered as JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed. Use POST to create a token.")]
    MethodNotAllowed,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        if err.is_user_error() {
            return ApiError::BadRequest(err.to_string());
        }
        tracing::error!("Token creation failed: {}", err);
        match err {
            OrchestratorError::NoConfiguration => ApiError::Internal(err.to_string()),
            _ => ApiError::Internal("Failed to create token".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
