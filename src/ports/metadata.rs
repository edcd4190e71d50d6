use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::AssetMetadata;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("No metadata for asset {0}")]
    NotFound(String),
    #[error("Metadata lookup failed: {0}")]
    LookupFailed(String),
    #[error("Invalid metadata account: {0}")]
    InvalidData(String),
}

/// Token metadata lookups keyed by mint address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataPort: Send + Sync {
    async fn find_by_asset(&self, mint: &Pubkey) -> Result<AssetMetadata, MetadataError>;
}
