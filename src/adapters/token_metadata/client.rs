//! Token Metadata Client
//!
//! Resolves name, symbol and uri for a mint by reading its Metaplex metadata
//! account through `getAccountInfo` with base64 encoding. One request per
//! mint; failures are reported, never retried.

use std::time::Duration;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::AssetMetadata;
use crate::ports::{MetadataError, MetadataPort};
use super::types::{
    decode_metadata, metadata_address, AccountInfoResponse, AccountInfoValue, METADATA_PROGRAM_ID,
};

#[derive(Debug, Error)]
pub enum TokenMetadataError {
    #[error("Metadata RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Metadata RPC rate limited the lookup")]
    RateLimited,

    #[error("Metadata RPC returned HTTP {0}")]
    Status(StatusCode),

    #[error("Metadata RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected RPC response: {0}")]
    MalformedResponse(String),

    #[error("No metadata account for mint {0}")]
    NoMetadataAccount(Pubkey),

    #[error("Account at the metadata address is owned by {0}")]
    ForeignOwner(String),

    #[error("Undecodable metadata account: {0}")]
    Undecodable(String),
}

impl From<TokenMetadataError> for MetadataError {
    fn from(err: TokenMetadataError) -> Self {
        match err {
            TokenMetadataError::NoMetadataAccount(mint) => MetadataError::NotFound(mint.to_string()),
            TokenMetadataError::ForeignOwner(_) | TokenMetadataError::Undecodable(_) => {
                MetadataError::InvalidData(err.to_string())
            }
            other => MetadataError::LookupFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenMetadataConfig {
    /// JSON-RPC endpoint holding the metadata accounts
    pub rpc_url: String,
    pub timeout: Duration,
}

impl Default for TokenMetadataConfig {
    fn default() -> Self {
        Self::for_endpoint("https://api.devnet.solana.com")
    }
}

impl TokenMetadataConfig {
    pub fn for_endpoint(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Metaplex metadata reader over Solana JSON-RPC
#[derive(Debug, Clone)]
pub struct TokenMetadataClient {
    config: TokenMetadataConfig,
    http: Client,
}

impl TokenMetadataClient {
    pub fn with_config(config: TokenMetadataConfig) -> Result<Self, TokenMetadataError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Name, symbol and uri recorded for `mint`
    pub async fn get_asset_metadata(&self, mint: &Pubkey) -> Result<AssetMetadata, TokenMetadataError> {
        let address = metadata_address(mint);
        tracing::debug!("Reading metadata account {} for mint {}", address, mint);

        let response = self.account_info(&address).await?;
        let account = Self::metadata_account(mint, response)?;
        Self::decode_account(account)
    }

    async fn account_info(&self, address: &Pubkey) -> Result<AccountInfoResponse, TokenMetadataError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [address.to_string(), { "encoding": "base64" }],
        });

        let response = self.http.post(&self.config.rpc_url).json(&body).send().await?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(TokenMetadataError::RateLimited),
            status if !status.is_success() => Err(TokenMetadataError::Status(status)),
            _ => response
                .json()
                .await
                .map_err(|e| TokenMetadataError::MalformedResponse(e.to_string())),
        }
    }

    /// The account value, if it exists and belongs to the metadata program
    fn metadata_account(
        mint: &Pubkey,
        response: AccountInfoResponse,
    ) -> Result<AccountInfoValue, TokenMetadataError> {
        if let Some(error) = response.error {
            return Err(TokenMetadataError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let account = response
            .result
            .ok_or_else(|| TokenMetadataError::MalformedResponse("missing result".into()))?
            .value
            .ok_or(TokenMetadataError::NoMetadataAccount(*mint))?;

        if account.owner != METADATA_PROGRAM_ID.to_string() {
            return Err(TokenMetadataError::ForeignOwner(account.owner));
        }
        Ok(account)
    }

    fn decode_account(account: AccountInfoValue) -> Result<AssetMetadata, TokenMetadataError> {
        let (encoded, encoding) = account.data;
        if encoding != "base64" {
            return Err(TokenMetadataError::Undecodable(format!("{} encoding", encoding)));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| TokenMetadataError::Undecodable(e.to_string()))?;
        decode_metadata(&bytes).map_err(TokenMetadataError::Undecodable)
    }

    pub fn rpc_url(&self) -> &str {
        &self.config.rpc_url
    }
}

#[async_trait]
impl MetadataPort for TokenMetadataClient {
    async fn find_by_asset(&self, mint: &Pubkey) -> Result<AssetMetadata, MetadataError> {
        Ok(self.get_asset_metadata(mint).await?)
    }
}
