//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Solana: RPC client and wallet management
//! - Bonding Curve: Dynamic Bonding Curve transaction service client
//! - Token Metadata: Metaplex metadata account reader
//! - HTTP: launchpad REST API
//! - CLI: Command-line interface handlers

pub mod solana;
pub mod bonding_curve;
pub mod token_metadata;
pub mod http;
pub mod cli;

pub use solana::{SolanaClient, WalletManager};
pub use bonding_curve::CurveServiceClient;
pub use token_metadata::TokenMetadataClient;
pub use http::{create_router, AppState};
pub use cli::CliApp;
