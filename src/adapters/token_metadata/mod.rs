//! Token Metadata Adapter
//!
//! Looks up the Metaplex metadata account of a mint and decodes its
//! name, symbol and uri.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbc_launchpad::adapters::token_metadata::{TokenMetadataClient, TokenMetadataConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TokenMetadataClient::with_config(TokenMetadataConfig::default())?;
//!     let mint = "So11111111111111111111111111111111111111112".parse()?;
//!     let metadata = client.get_asset_metadata(&mint).await?;
//!     println!("{} ({})", metadata.name, metadata.symbol);
//!     Ok(())
//! }
//! ```

mod client;
mod types;

pub use client::{TokenMetadataClient, TokenMetadataConfig, TokenMetadataError};
pub use types::{decode_metadata, metadata_address, METADATA_PROGRAM_ID};
