//! Bonding Curve Service Types
//!
//! Request and response structures for the curve service HTTP API.
//! Addresses travel as base58 strings, reserves as decimal strings.

use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};
use std::str::FromStr;

use crate::domain::{CurveParams, PoolAccount};
use crate::ports::{CreateConfigParams, CreatePoolParams};

/// Body of `POST /config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigRequest {
    pub config: String,
    pub fee_claimer: String,
    pub leftover_receiver: String,
    pub payer: String,
    pub quote_mint: String,
    #[serde(flatten)]
    pub curve: CurveParams,
}

impl From<&CreateConfigParams> for CreateConfigRequest {
    fn from(params: &CreateConfigParams) -> Self {
        Self {
            config: params.config.to_string(),
            fee_claimer: params.fee_claimer.to_string(),
            leftover_receiver: params.leftover_receiver.to_string(),
            payer: params.payer.to_string(),
            quote_mint: params.quote_mint.to_string(),
            curve: params.curve.clone(),
        }
    }
}

/// Body of `POST /pool`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    pub base_mint: String,
    pub config: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub payer: String,
    pub pool_creator: String,
}

impl From<&CreatePoolParams> for CreatePoolRequest {
    fn from(params: &CreatePoolParams) -> Self {
        Self {
            base_mint: params.base_mint.to_string(),
            config: params.config.to_string(),
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            uri: params.uri.clone(),
            payer: params.payer.to_string(),
            pool_creator: params.pool_creator.to_string(),
        }
    }
}

/// Response of the transaction-building endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Base64 encoded serialized transaction, unsigned
    pub transaction: String,
}

impl TransactionResponse {
    /// Get the transaction bytes from base64
    pub fn transaction_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.transaction)
    }

    /// Decode into a legacy transaction
    pub fn decode(&self) -> Result<Transaction, String> {
        let bytes = self.transaction_bytes().map_err(|e| format!("bad base64: {}", e))?;
        bincode::deserialize(&bytes).map_err(|e| format!("bad transaction: {}", e))
    }
}

/// Response of `GET /pools?config=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsResponse {
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub public_key: String,
    pub account: PoolAccountData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAccountData {
    pub base_mint: String,
    pub config: String,
    pub base_reserve: String,
    pub quote_reserve: String,
    #[serde(default)]
    pub is_migrated: bool,
}

impl TryFrom<PoolEntry> for PoolAccount {
    type Error = String;

    fn try_from(entry: PoolEntry) -> Result<Self, Self::Error> {
        let address = parse_key("publicKey", &entry.public_key)?;
        let base_mint = parse_key("baseMint", &entry.account.base_mint)?;
        let config = parse_key("config", &entry.account.config)?;
        let base_reserve = parse_amount("baseReserve", &entry.account.base_reserve)?;
        let quote_reserve = parse_amount("quoteReserve", &entry.account.quote_reserve)?;

        Ok(PoolAccount {
            address,
            base_mint,
            config,
            base_reserve,
            quote_reserve,
            is_migrated: entry.account.is_migrated,
        })
    }
}

fn parse_key(field: &str, raw: &str) -> Result<Pubkey, String> {
    Pubkey::from_str(raw).map_err(|e| format!("{} '{}': {}", field, raw, e))
}

fn parse_amount(field: &str, raw: &str) -> Result<u64, String> {
    raw.parse().map_err(|e| format!("{} '{}': {}", field, raw, e))
}
