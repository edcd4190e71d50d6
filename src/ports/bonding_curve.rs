use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};
use thiserror::Error;

use crate::domain::{CurveParams, PoolAccount};

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Bonding curve service request failed: {0}")]
    ServiceError(String),
    #[error("Invalid response from bonding curve service: {0}")]
    InvalidResponse(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Accounts and curve inputs for a new configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConfigParams {
    pub config: Pubkey,
    pub fee_claimer: Pubkey,
    pub leftover_receiver: Pubkey,
    pub payer: Pubkey,
    pub quote_mint: Pubkey,
    pub curve: CurveParams,
}

/// Accounts and token metadata for a new pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolParams {
    pub base_mint: Pubkey,
    pub config: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub payer: Pubkey,
    pub pool_creator: Pubkey,
}

/// Bonding curve service: builds unsigned transactions and enumerates pools
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BondingCurvePort: Send + Sync {
    /// Unsigned transaction creating a configuration account
    async fn create_config(&self, params: CreateConfigParams) -> Result<Transaction, CurveError>;

    /// Unsigned transaction creating a pool and its base mint
    async fn create_pool(&self, params: CreatePoolParams) -> Result<Transaction, CurveError>;

    /// All pools registered under `config`, in the service's order
    async fn get_pools_by_config(&self, config: &Pubkey) -> Result<Vec<PoolAccount>, CurveError>;
}
