use async_trait::async_trait;
use solana_sdk::{hash::Hash, signature::Signature};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Transaction rejected: {0}")]
    TransactionError(String),
    #[error("Invalid transaction bytes: {0}")]
    InvalidTransaction(String),
    #[error("Timeout waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
}

/// Remote ledger operations used by the creation flow.
///
/// Every call is attempted once; callers decide what a failure means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// Latest blockhash to stamp onto new transactions
    async fn get_latest_blockhash(&self) -> Result<Hash, LedgerError>;

    /// Submit a fully signed, serialized transaction
    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<Signature, LedgerError>;

    /// Wait until the transaction reaches the client's commitment level
    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), LedgerError>;
}
