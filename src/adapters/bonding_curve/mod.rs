//! Bonding Curve Service Adapter
//!
//! Talks to the Dynamic Bonding Curve transaction service, which owns curve
//! construction and account derivation. Returned transactions are unsigned and
//! already list the payer as fee payer.

mod client;
mod types;

pub use client::{CurveServiceClient, CurveServiceConfig, CurveServiceError};
pub use types::{CreateConfigRequest, CreatePoolRequest, PoolsResponse, TransactionResponse};
