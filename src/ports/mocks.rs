//! In-memory port implementations that record calls and return canned data.
//! Used by unit and integration tests; no network access.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    system_instruction,
    transaction::Transaction,
};

use crate::domain::{AssetMetadata, PoolAccount};
use super::{
    BondingCurvePort, CreateConfigParams, CreatePoolParams, CurveError, LedgerError, LedgerPort,
    MetadataError, MetadataPort,
};

/// Rent for an 82-byte mint account
const MINT_RENT_LAMPORTS: u64 = 1_461_600;
const MINT_SPACE: u64 = 82;

/// Mock ledger with a fixed blockhash that records submitted transactions
#[derive(Debug, Clone)]
pub struct MockLedger {
    blockhash: Hash,
    sent: Arc<Mutex<Vec<Transaction>>>,
    confirmed: Arc<Mutex<Vec<Signature>>>,
    fail_blockhash: bool,
    fail_send: bool,
    fail_confirm: bool,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            sent: Arc::new(Mutex::new(Vec::new())),
            confirmed: Arc::new(Mutex::new(Vec::new())),
            fail_blockhash: false,
            fail_send: false,
            fail_confirm: false,
        }
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_blockhash(mut self) -> Self {
        self.fail_blockhash = true;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn failing_confirm(mut self) -> Self {
        self.fail_confirm = true;
        self
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    /// Transactions submitted so far
    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    /// Signatures confirmed so far
    pub fn confirmed(&self) -> Vec<Signature> {
        self.confirmed.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerPort for MockLedger {
    async fn get_latest_blockhash(&self) -> Result<Hash, LedgerError> {
        if self.fail_blockhash {
            return Err(LedgerError::RpcError("blockhash unavailable".into()));
        }
        Ok(self.blockhash)
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<Signature, LedgerError> {
        if self.fail_send {
            return Err(LedgerError::TransactionError("node is behind".into()));
        }
        let tx: Transaction = bincode::deserialize(bytes)
            .map_err(|e| LedgerError::InvalidTransaction(e.to_string()))?;
        tx.verify()
            .map_err(|e| LedgerError::TransactionError(e.to_string()))?;

        let signature = tx.signatures.first().copied().unwrap_or_default();
        self.sent.lock().unwrap().push(tx);
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), LedgerError> {
        if self.fail_confirm {
            return Err(LedgerError::ConfirmationTimeout(signature.to_string()));
        }
        self.confirmed.lock().unwrap().push(*signature);
        Ok(())
    }
}

/// Mock bonding curve service with per-config pool lists
#[derive(Debug, Clone, Default)]
pub struct MockCurveService {
    pools: Arc<Mutex<HashMap<Pubkey, Vec<PoolAccount>>>>,
    pool_requests: Arc<Mutex<Vec<CreatePoolParams>>>,
    config_requests: Arc<Mutex<Vec<CreateConfigParams>>>,
    fail_enumeration: bool,
    fail_create: bool,
}

impl MockCurveService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register pools returned for `config`
    pub fn with_pools(self, config: Pubkey, pools: Vec<PoolAccount>) -> Self {
        self.pools.lock().unwrap().insert(config, pools);
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn pool_requests(&self) -> Vec<CreatePoolParams> {
        self.pool_requests.lock().unwrap().clone()
    }

    pub fn config_requests(&self) -> Vec<CreateConfigParams> {
        self.config_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BondingCurvePort for MockCurveService {
    async fn create_config(&self, params: CreateConfigParams) -> Result<Transaction, CurveError> {
        if self.fail_create {
            return Err(CurveError::ServiceError("curve service unavailable".into()));
        }
        let ix = system_instruction::create_account(
            &params.payer,
            &params.config,
            MINT_RENT_LAMPORTS,
            MINT_SPACE,
            &Pubkey::new_unique(),
        );
        let tx = Transaction::new_with_payer(&[ix], Some(&params.payer));
        self.config_requests.lock().unwrap().push(params);
        Ok(tx)
    }

    async fn create_pool(&self, params: CreatePoolParams) -> Result<Transaction, CurveError> {
        if self.fail_create {
            return Err(CurveError::ServiceError("curve service unavailable".into()));
        }
        let ix = system_instruction::create_account(
            &params.payer,
            &params.base_mint,
            MINT_RENT_LAMPORTS,
            MINT_SPACE,
            &spl_token::id(),
        );
        let tx = Transaction::new_with_payer(&[ix], Some(&params.payer));
        self.pool_requests.lock().unwrap().push(params);
        Ok(tx)
    }

    async fn get_pools_by_config(&self, config: &Pubkey) -> Result<Vec<PoolAccount>, CurveError> {
        if self.fail_enumeration {
            return Err(CurveError::ServiceError("getProgramAccounts timed out".into()));
        }
        Ok(self
            .pools
            .lock()
            .unwrap()
            .get(config)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock metadata service; unknown mints are reported as not found
#[derive(Debug, Clone, Default)]
pub struct MockMetadata {
    entries: Arc<Mutex<HashMap<Pubkey, AssetMetadata>>>,
    failing: Arc<Mutex<HashSet<Pubkey>>>,
    calls: Arc<Mutex<Vec<Pubkey>>>,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(self, mint: Pubkey, metadata: AssetMetadata) -> Self {
        self.entries.lock().unwrap().insert(mint, metadata);
        self
    }

    /// Make lookups for `mint` fail with a transport error
    pub fn failing_for(self, mint: Pubkey) -> Self {
        self.failing.lock().unwrap().insert(mint);
        self
    }

    /// Mints looked up, in call order
    pub fn calls(&self) -> Vec<Pubkey> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataPort for MockMetadata {
    async fn find_by_asset(&self, mint: &Pubkey) -> Result<AssetMetadata, MetadataError> {
        self.calls.lock().unwrap().push(*mint);
        if self.failing.lock().unwrap().contains(mint) {
            return Err(MetadataError::LookupFailed(format!("rpc error for {}", mint)));
        }
        self.entries
            .lock()
            .unwrap()
            .get(mint)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(mint.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::{Keypair, Signer};

    #[tokio::test]
    async fn test_mock_metadata() {
        let known = Pubkey::new_unique();
        let broken = Pubkey::new_unique();
        let mock = MockMetadata::new()
            .with_metadata(known, AssetMetadata::new("Moon", "MOON", ""))
            .failing_for(broken);

        assert_eq!(mock.find_by_asset(&known).await.unwrap().symbol, "MOON");
        assert!(matches!(mock.find_by_asset(&broken).await, Err(MetadataError::LookupFailed(_))));
        assert!(matches!(
            mock.find_by_asset(&Pubkey::new_unique()).await,
            Err(MetadataError::NotFound(_))
        ));
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_curve_pool_tx_needs_mint_signature() {
        let mock = MockCurveService::new();
        let payer = Pubkey::new_unique();
        let mint = Keypair::new();
        let tx = mock
            .create_pool(CreatePoolParams {
                base_mint: mint.pubkey(),
                config: Pubkey::new_unique(),
                name: "Test".into(),
                symbol: "TST".into(),
                uri: String::new(),
                payer,
                pool_creator: payer,
            })
            .await
            .unwrap();

        assert_eq!(tx.message.header.num_required_signatures, 2);
        assert_eq!(tx.message.account_keys[0], payer);
        assert_eq!(mock.pool_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_ledger_rejects_unsigned() {
        let ledger = MockLedger::new();
        let payer = Keypair::new();
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1);
        let tx = Transaction::new_with_payer(&[ix], Some(&payer.pubkey()));

        let bytes = bincode::serialize(&tx).unwrap();
        assert!(ledger.send_raw_transaction(&bytes).await.is_err());
        assert!(ledger.sent().is_empty());
    }
}
