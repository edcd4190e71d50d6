//! Pool Records
//!
//! Read-only projections of bonding-curve pools under a configuration, and the
//! listing result returned to callers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Display name used when metadata is missing
pub const UNKNOWN_NAME: &str = "Unknown";
/// Display symbol used when metadata is missing
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Pool state as reported by the bonding curve service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAccount {
    pub address: Pubkey,
    pub base_mint: Pubkey,
    pub config: Pubkey,
    /// Base token reserve in base units (9 decimals)
    pub base_reserve: u64,
    /// Quote token reserve in lamports
    pub quote_reserve: u64,
    pub is_migrated: bool,
}

/// Descriptive token metadata resolved for a mint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl AssetMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
        }
    }
}

/// One pool in a listing. Identity is `pool_address`; the other fields are descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    #[serde(rename = "poolKey")]
    pub pool_address: String,
    #[serde(rename = "baseMintKey")]
    pub base_mint_address: String,
    #[serde(rename = "config")]
    pub config_address: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub base_supply: String,
    pub quote_supply: String,
    pub is_migrated: bool,
    pub pool_index: usize,
}

impl PoolRecord {
    /// Build a record, falling back to sentinels for missing or empty metadata
    pub fn from_account(
        pool_index: usize,
        config: &str,
        account: &PoolAccount,
        metadata: Option<&AssetMetadata>,
    ) -> Self {
        let name = metadata
            .map(|m| m.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NAME);
        let symbol = metadata
            .map(|m| m.symbol.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SYMBOL);
        let uri = metadata.map(|m| m.uri.as_str()).unwrap_or("");

        Self {
            pool_address: account.address.to_string(),
            base_mint_address: account.base_mint.to_string(),
            config_address: config.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.to_string(),
            base_supply: format_base_supply(account.base_reserve),
            quote_supply: account.quote_reserve.to_string(),
            is_migrated: account.is_migrated,
            pool_index,
        }
    }

    /// True when metadata could not be resolved for this pool
    pub fn is_unresolved(&self) -> bool {
        self.name == UNKNOWN_NAME && self.symbol == UNKNOWN_SYMBOL
    }
}

/// Base reserve scaled down by 10^9, without trailing zeros
pub fn format_base_supply(base_reserve: u64) -> String {
    (Decimal::from(base_reserve) / dec!(1_000_000_000))
        .normalize()
        .to_string()
}

/// Result of listing pools under one configuration.
///
/// `total_pools` always equals `pools.len()`; a failed listing carries no pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolListing {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_pools: usize,
    pub config: Option<String>,
    pub pools: Vec<PoolRecord>,
}

impl PoolListing {
    /// Successful listing
    pub fn found(config: impl Into<String>, pools: Vec<PoolRecord>) -> Self {
        Self {
            success: true,
            error: None,
            total_pools: pools.len(),
            config: Some(config.into()),
            pools,
        }
    }

    /// Failed listing with the zeroed result shape
    pub fn failed(config: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            total_pools: 0,
            config,
            pools: Vec::new(),
        }
    }

    /// Check the count/shape invariants
    pub fn is_consistent(&self) -> bool {
        self.total_pools == self.pools.len() && (self.success || self.pools.is_empty())
    }
}
