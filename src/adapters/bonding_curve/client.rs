//! Bonding Curve Service Client
//!
//! HTTP client for the Dynamic Bonding Curve transaction service.
//! Builds unsigned config/pool transactions and enumerates pools by config.
//! Each request is attempted once.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};
use thiserror::Error;

use crate::domain::PoolAccount;
use crate::ports::{BondingCurvePort, CreateConfigParams, CreatePoolParams, CurveError};
use super::types::{CreateConfigRequest, CreatePoolRequest, PoolsResponse, TransactionResponse};

#[derive(Debug, Error)]
pub enum CurveServiceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimited,
}

impl From<CurveServiceError> for CurveError {
    fn from(err: CurveServiceError) -> Self {
        match err {
            CurveServiceError::ApiError { status, message } if status == 400 => {
                CurveError::InvalidParameters(message)
            }
            CurveServiceError::ParseError(msg) => CurveError::InvalidResponse(msg),
            other => CurveError::ServiceError(other.to_string()),
        }
    }
}

/// Curve service client configuration
#[derive(Debug, Clone)]
pub struct CurveServiceConfig {
    /// Base URL for the service
    pub api_base_url: String,
    /// Optional API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CurveServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8787".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Dynamic Bonding Curve service client
#[derive(Debug, Clone)]
pub struct CurveServiceClient {
    config: CurveServiceConfig,
    http: Client,
}

impl CurveServiceClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, CurveServiceError> {
        Self::with_config(CurveServiceConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CurveServiceConfig) -> Result<Self, CurveServiceError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Request an unsigned create-config transaction
    pub async fn create_config_transaction(
        &self,
        request: &CreateConfigRequest,
    ) -> Result<TransactionResponse, CurveServiceError> {
        let url = format!("{}/config", self.base_url());
        let response = self.authorize(self.http.post(&url).json(request)).send().await?;
        self.handle_response(response).await
    }

    /// Request an unsigned create-pool transaction
    pub async fn create_pool_transaction(
        &self,
        request: &CreatePoolRequest,
    ) -> Result<TransactionResponse, CurveServiceError> {
        let url = format!("{}/pool", self.base_url());
        let response = self.authorize(self.http.post(&url).json(request)).send().await?;
        self.handle_response(response).await
    }

    /// List pools registered under a configuration
    pub async fn list_pools(&self, config: &str) -> Result<PoolsResponse, CurveServiceError> {
        let url = format!("{}/pools", self.base_url());
        let response = self
            .authorize(self.http.get(&url).query(&[("config", config)]))
            .send()
            .await?;
        self.handle_response(response).await
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => req.header("x-api-key", api_key),
            None => req,
        }
    }

    /// Handle API response and deserialize
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CurveServiceError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CurveServiceError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CurveServiceError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CurveServiceError::ParseError(e.to_string()))
    }

    /// Get the configured API base URL
    pub fn base_url(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl BondingCurvePort for CurveServiceClient {
    async fn create_config(&self, params: CreateConfigParams) -> Result<Transaction, CurveError> {
        params
            .curve
            .validate()
            .map_err(|e| CurveError::InvalidParameters(e.to_string()))?;

        let response = self
            .create_config_transaction(&CreateConfigRequest::from(&params))
            .await?;
        response.decode().map_err(CurveError::InvalidResponse)
    }

    async fn create_pool(&self, params: CreatePoolParams) -> Result<Transaction, CurveError> {
        let response = self
            .create_pool_transaction(&CreatePoolRequest::from(&params))
            .await?;
        response.decode().map_err(CurveError::InvalidResponse)
    }

    async fn get_pools_by_config(&self, config: &Pubkey) -> Result<Vec<PoolAccount>, CurveError> {
        let response = self.list_pools(&config.to_string()).await?;

        response
            .pools
            .into_iter()
            .map(|entry| PoolAccount::try_from(entry).map_err(CurveError::InvalidResponse))
            .collect()
    }
}
