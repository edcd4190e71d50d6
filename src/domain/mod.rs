//! Domain Layer - Core types for the launchpad
//!
//! Pure types and validation with no network access. External calls go
//! through the ports layer.
//!
//! - `token`: submitted token fields and validation
//! - `pool`: pool projections and listing results
//! - `envelope`: partially signed transactions in transit
//! - `curve`: bonding curve configuration parameters

pub mod token;
pub mod pool;
pub mod envelope;
pub mod curve;

pub use token::{TokenForm, TokenDescriptor, TokenSummary, ValidationError};
pub use pool::{AssetMetadata, PoolAccount, PoolListing, PoolRecord, UNKNOWN_NAME, UNKNOWN_SYMBOL};
pub use envelope::{EnvelopeError, TransactionEnvelope};
pub use curve::{CurveParams, CurveParamsError};
