//! Token Descriptor
//!
//! Raw token fields as submitted by a caller, and the validated descriptor the
//! creation flow works with. Limits follow the Metaplex metadata account sizes.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use thiserror::Error;

/// Maximum token name length in bytes
pub const MAX_NAME_LEN: usize = 32;
/// Maximum token symbol length in bytes
pub const MAX_SYMBOL_LEN: usize = 10;
/// Maximum metadata URI length in bytes
pub const MAX_URI_LEN: usize = 200;

/// Field-level validation failures (surfaced as 400s)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Missing required fields: totalSupply or config")]
    MissingSupplyOrConfig,

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending field, if a single field is at fault
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField(field) => Some(field),
            ValidationError::InvalidField { field, .. } => Some(field),
            ValidationError::MissingSupplyOrConfig => None,
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Token fields exactly as they arrive from a JSON body or multipart form.
/// Blank strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub total_supply: Option<String>,
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Image reference (file name for multipart uploads, data URL or link for JSON)
    #[serde(default)]
    pub image: Option<String>,
}

impl TokenForm {
    /// Create a form with the three fields every launch needs
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, total_supply: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            symbol: Some(symbol.into()),
            total_supply: Some(total_supply.into()),
            ..Default::default()
        }
    }

    pub fn with_wallet(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = Some(wallet_address.into());
        self
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Validate and convert into a [`TokenDescriptor`]
    pub fn validate(self) -> Result<TokenDescriptor, ValidationError> {
        let name = present(self.name).ok_or(ValidationError::MissingField("name"))?;
        let symbol = present(self.symbol).ok_or(ValidationError::MissingField("symbol"))?;

        if name.len() > MAX_NAME_LEN {
            return Err(ValidationError::invalid(
                "name",
                format!("must be at most {} bytes, got {}", MAX_NAME_LEN, name.len()),
            ));
        }
        if symbol.len() > MAX_SYMBOL_LEN {
            return Err(ValidationError::invalid(
                "symbol",
                format!("must be at most {} bytes, got {}", MAX_SYMBOL_LEN, symbol.len()),
            ));
        }

        let total_supply = match present(self.total_supply) {
            Some(raw) => Some(parse_supply(&raw)?),
            None => None,
        };
        let config = present(self.config)
            .map(|raw| parse_pubkey("config", &raw))
            .transpose()?;

        if total_supply.is_none() && config.is_none() {
            return Err(ValidationError::MissingSupplyOrConfig);
        }

        let uri = present(self.uri);
        if let Some(ref uri) = uri {
            if uri.len() > MAX_URI_LEN {
                return Err(ValidationError::invalid(
                    "uri",
                    format!("must be at most {} bytes, got {}", MAX_URI_LEN, uri.len()),
                ));
            }
        }

        let wallet_address = present(self.wallet_address)
            .map(|raw| parse_pubkey("walletAddress", &raw))
            .transpose()?;

        Ok(TokenDescriptor {
            name,
            symbol,
            total_supply,
            config,
            uri,
            wallet_address,
            has_image: present(self.image).is_some(),
        })
    }
}

/// A validated token launch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub name: String,
    pub symbol: String,
    pub total_supply: Option<u64>,
    pub config: Option<Pubkey>,
    pub uri: Option<String>,
    pub wallet_address: Option<Pubkey>,
    pub has_image: bool,
}

impl TokenDescriptor {
    /// Echo of the submitted token returned to the caller
    pub fn summary(&self) -> TokenSummary {
        TokenSummary {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            total_supply: self.total_supply.map(|s| s.to_string()),
            has_image: self.has_image,
        }
    }
}

/// `tokenData` block of the creation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub name: String,
    pub symbol: String,
    pub total_supply: Option<String>,
    pub has_image: bool,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_supply(raw: &str) -> Result<u64, ValidationError> {
    let supply: u64 = raw
        .parse()
        .map_err(|_| ValidationError::invalid("totalSupply", format!("'{}' is not a whole number", raw)))?;
    if supply == 0 {
        return Err(ValidationError::invalid("totalSupply", "must be greater than zero"));
    }
    Ok(supply)
}

/// Parse a base58 address, attributing failures to `field`
pub fn parse_pubkey(field: &'static str, raw: &str) -> Result<Pubkey, ValidationError> {
    Pubkey::from_str(raw.trim())
        .map_err(|e| ValidationError::invalid(field, format!("'{}' is not a valid address: {}", raw, e)))
}
