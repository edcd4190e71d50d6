//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/devnet.toml.

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{token::MAX_URI_LEN, CurveParams};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    pub solana: SolanaSection,
    pub curve_service: CurveServiceSection,
    #[serde(default)]
    pub metadata: MetadataSection,
    #[serde(default)]
    pub launchpad: LaunchpadSection,
    #[serde(default)]
    pub curve: CurveSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// HTTP server section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Address the API binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SolanaSection {
    /// RPC endpoint
    pub rpc_url: String,
    /// Commitment level: "processed", "confirmed", "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
    /// Server keypair path (JSON byte array). Signs configs and CLI launches.
    pub keypair_path: String,
    /// How long to wait for a submitted transaction to confirm
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,
}

impl SolanaSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }

    /// Get keypair path with environment variable override and `~` expanded
    pub fn get_keypair_path(&self) -> String {
        let raw = std::env::var("SOLANA_KEYPAIR_PATH").unwrap_or_else(|_| self.keypair_path.clone());
        shellexpand::tilde(&raw).to_string()
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

/// Bonding curve service section
#[derive(Debug, Clone, Deserialize)]
pub struct CurveServiceSection {
    /// Service base URL
    pub api_url: String,
    /// Optional API key
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_service_timeout_secs")]
    pub timeout_secs: u64,
}

impl CurveServiceSection {
    /// Checks CURVE_SERVICE_URL env var first, falls back to config value
    pub fn get_api_url(&self) -> String {
        std::env::var("CURVE_SERVICE_URL").unwrap_or_else(|_| self.api_url.clone())
    }

    /// Get API key with environment variable fallback
    /// Checks CURVE_SERVICE_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("CURVE_SERVICE_API_KEY").ok()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Token metadata lookup section
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataSection {
    /// RPC endpoint for metadata accounts; defaults to the Solana RPC
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default = "default_metadata_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            rpc_url: None,
            timeout_secs: default_metadata_timeout_secs(),
        }
    }
}

impl MetadataSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Launch behaviour section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchpadSection {
    /// Configuration used when a request names none
    #[serde(default)]
    pub default_config: Option<String>,
    /// Create a new configuration for every token that carries a supply
    #[serde(default)]
    pub create_config_per_token: bool,
    /// Metadata URI used when a request has none
    #[serde(default)]
    pub default_uri: String,
}

impl LaunchpadSection {
    /// Parsed default configuration address
    pub fn default_config_key(&self) -> Result<Option<Pubkey>, ConfigError> {
        self.default_config
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| {
                Pubkey::from_str(c).map_err(|e| {
                    ConfigError::ValidationError(format!("default_config '{}' is invalid: {}", c, e))
                })
            })
            .transpose()
    }
}

/// Bonding curve parameters for configs created by this server
#[derive(Debug, Clone, Deserialize)]
pub struct CurveSection {
    #[serde(default = "default_supply_on_migration")]
    pub percentage_supply_on_migration: u8,
    /// Quote amount (whole SOL) that triggers migration
    #[serde(default = "default_migration_threshold")]
    pub migration_quote_threshold: u64,
    #[serde(default = "default_base_decimals")]
    pub token_base_decimal: u8,
    #[serde(default = "default_quote_decimals")]
    pub token_quote_decimal: u8,
    #[serde(default = "default_fee_bps")]
    pub starting_fee_bps: u16,
    #[serde(default = "default_fee_bps")]
    pub ending_fee_bps: u16,
    #[serde(default = "default_true")]
    pub dynamic_fee_enabled: bool,
    #[serde(default = "default_locked_lp")]
    pub partner_locked_lp_percentage: u8,
    #[serde(default)]
    pub creator_trading_fee_percentage: u8,
    #[serde(default = "default_migrated_pool_fee_bps")]
    pub migrated_pool_fee_bps: u16,
}

impl Default for CurveSection {
    fn default() -> Self {
        Self {
            percentage_supply_on_migration: default_supply_on_migration(),
            migration_quote_threshold: default_migration_threshold(),
            token_base_decimal: default_base_decimals(),
            token_quote_decimal: default_quote_decimals(),
            starting_fee_bps: default_fee_bps(),
            ending_fee_bps: default_fee_bps(),
            dynamic_fee_enabled: true,
            partner_locked_lp_percentage: default_locked_lp(),
            creator_trading_fee_percentage: 0,
            migrated_pool_fee_bps: default_migrated_pool_fee_bps(),
        }
    }
}

impl CurveSection {
    /// Full curve parameters for a supply
    pub fn params_for(&self, total_supply: u64) -> CurveParams {
        let mut params = CurveParams::launchpad_defaults(total_supply);
        params.percentage_supply_on_migration = self.percentage_supply_on_migration;
        params.migration_quote_threshold = self.migration_quote_threshold;
        params.token_base_decimal = self.token_base_decimal;
        params.token_quote_decimal = self.token_quote_decimal;
        params.base_fee_params.starting_fee_bps = self.starting_fee_bps;
        params.base_fee_params.ending_fee_bps = self.ending_fee_bps;
        params.dynamic_fee_enabled = self.dynamic_fee_enabled;
        params.partner_locked_lp_percentage = self.partner_locked_lp_percentage;
        params.partner_lp_percentage = 100 - self.partner_locked_lp_percentage.min(100);
        params.creator_trading_fee_percentage = self.creator_trading_fee_percentage;
        params.migrated_pool_fee.dynamic_fee = self.dynamic_fee_enabled;
        params.migrated_pool_fee.pool_fee_bps = self.migrated_pool_fee_bps;
        params
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_confirm_timeout_secs() -> u64 {
    60
}
fn default_service_timeout_secs() -> u64 {
    30
}
fn default_metadata_timeout_secs() -> u64 {
    10
}
fn default_supply_on_migration() -> u8 {
    10
}
fn default_migration_threshold() -> u64 {
    300
}
fn default_base_decimals() -> u8 {
    6
}
fn default_quote_decimals() -> u8 {
    9
}
fn default_fee_bps() -> u16 {
    100
}
fn default_true() -> bool {
    true
}
fn default_locked_lp() -> u8 {
    100
}
fn default_migrated_pool_fee_bps() -> u16 {
    250
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Malformed TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Read, parse and validate a TOML config file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(&std::fs::read_to_string(path)?)?;
    config.validate()?;
    Ok(config)
}

fn ensure(ok: bool, message: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(message()))
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("server.bind_address", &self.server.bind_address),
            ("solana.rpc_url", &self.solana.rpc_url),
            ("solana.keypair_path", &self.solana.keypair_path),
            ("curve_service.api_url", &self.curve_service.api_url),
        ];
        for (key, value) in required {
            ensure(!value.trim().is_empty(), || format!("{} must be set", key))?;
        }

        let commitment = self.solana.commitment.as_str();
        ensure(
            matches!(commitment, "processed" | "confirmed" | "finalized"),
            || format!("solana.commitment '{}' is not processed, confirmed or finalized", commitment),
        )?;
        ensure(self.solana.confirm_timeout_secs > 0, || {
            "solana.confirm_timeout_secs must be positive".to_string()
        })?;

        self.launchpad.default_config_key()?;
        ensure(self.launchpad.default_uri.len() <= MAX_URI_LEN, || {
            format!("launchpad.default_uri exceeds {} bytes", MAX_URI_LEN)
        })?;

        // Any positive supply exercises the same percentage and fee checks
        self.curve
            .params_for(1)
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("curve: {}", e)))
    }

    /// Metadata RPC endpoint, falling back to the Solana RPC
    pub fn metadata_rpc_url(&self) -> String {
        self.metadata
            .rpc_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.solana.get_rpc_url())
    }
}
