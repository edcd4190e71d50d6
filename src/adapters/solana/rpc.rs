use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    signature::Signature,
    transaction::VersionedTransaction,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::ports::{LedgerError, LedgerPort};

#[derive(Debug, Error)]
pub enum SolanaClientError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Transaction failed: {0}")]
    TransactionError(String),
    #[error("Invalid transaction bytes: {0}")]
    InvalidTransaction(String),
    #[error("Invalid commitment level: {0}")]
    InvalidCommitment(String),
    #[error("Timeout waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
}

impl From<SolanaClientError> for LedgerError {
    fn from(err: SolanaClientError) -> Self {
        match err {
            SolanaClientError::RpcError(msg) | SolanaClientError::InvalidCommitment(msg) => {
                LedgerError::RpcError(msg)
            }
            SolanaClientError::TransactionError(msg) => LedgerError::TransactionError(msg),
            SolanaClientError::InvalidTransaction(msg) => LedgerError::InvalidTransaction(msg),
            SolanaClientError::ConfirmationTimeout(sig) => LedgerError::ConfirmationTimeout(sig),
        }
    }
}

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl SolanaClient {
    /// Create a new Solana RPC client at `confirmed` commitment
    pub fn new(rpc_url: String) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self {
            client,
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Create a client from a commitment name ("processed", "confirmed", "finalized")
    pub fn from_commitment_name(rpc_url: String, commitment: &str) -> Result<Self, SolanaClientError> {
        let commitment = CommitmentConfig::from_str(commitment)
            .map_err(|_| SolanaClientError::InvalidCommitment(commitment.to_string()))?;
        Ok(Self::with_commitment(rpc_url, commitment))
    }

    /// Set how long `confirm_transaction` polls before giving up
    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    /// Get recent blockhash (needed for transaction building)
    pub async fn get_latest_blockhash(&self) -> Result<Hash, SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_latest_blockhash()
                .map_err(|e| SolanaClientError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::RpcError(format!("Task join error: {}", e)))?
    }

    /// Send a serialized, fully signed transaction
    pub async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<Signature, SolanaClientError> {
        let tx: VersionedTransaction = bincode::deserialize(bytes)
            .map_err(|e| SolanaClientError::InvalidTransaction(e.to_string()))?;
        let client = Arc::clone(&self.client);

        tokio::task::spawn_blocking(move || {
            client
                .send_transaction(&tx)
                .map_err(|e| SolanaClientError::TransactionError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::RpcError(format!("Task join error: {}", e)))?
    }

    /// Poll signature status until it lands at the client's commitment or the timeout passes
    pub async fn confirm_transaction(&self, signature: &Signature) -> Result<(), SolanaClientError> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            let client = Arc::clone(&self.client);
            let sig = *signature;
            let status = tokio::task::spawn_blocking(move || {
                client
                    .get_signature_status(&sig)
                    .map_err(|e| SolanaClientError::RpcError(e.to_string()))
            })
            .await
            .map_err(|e| SolanaClientError::RpcError(format!("Task join error: {}", e)))??;

            match status {
                Some(Ok(())) => {
                    tracing::debug!("Transaction {} confirmed", signature);
                    return Ok(());
                }
                Some(Err(e)) => return Err(SolanaClientError::TransactionError(e.to_string())),
                None if Instant::now() >= deadline => {
                    return Err(SolanaClientError::ConfirmationTimeout(signature.to_string()));
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

#[async_trait]
impl LedgerPort for SolanaClient {
    async fn get_latest_blockhash(&self) -> Result<Hash, LedgerError> {
        Ok(SolanaClient::get_latest_blockhash(self).await?)
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<Signature, LedgerError> {
        Ok(SolanaClient::send_raw_transaction(self, bytes).await?)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), LedgerError> {
        Ok(SolanaClient::confirm_transaction(self, signature).await?)
    }
}
