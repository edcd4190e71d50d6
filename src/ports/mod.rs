//! Ports Layer - Trait definitions for external collaborators
//!
//! Following hexagonal architecture, these traits abstract:
//! - The ledger RPC endpoint (blockhash, submission, confirmation)
//! - The bonding curve service (config/pool transactions, pool enumeration)
//! - The token metadata service (name/symbol/uri by mint)

pub mod ledger;
pub mod bonding_curve;
pub mod metadata;
pub mod mocks;

pub use ledger::{LedgerError, LedgerPort};
pub use bonding_curve::{BondingCurvePort, CreateConfigParams, CreatePoolParams, CurveError};
pub use metadata::{MetadataError, MetadataPort};
