//! Token Creation Orchestrator
//!
//! Validates a token launch request, resolves the configuration it belongs to,
//! and, when the caller supplies a wallet, prepares the pool-creation
//! transaction for that wallet to sign. Nothing is persisted.

use std::sync::Arc;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use thiserror::Error;

use crate::domain::{
    EnvelopeError, TokenDescriptor, TokenForm, TokenSummary, TransactionEnvelope, ValidationError,
};
use crate::ports::{BondingCurvePort, CreatePoolParams, CurveError, LedgerError, LedgerPort};
use super::config_builder::{ConfigBuilder, ConfigBuilderError};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("No configuration available")]
    NoConfiguration,
    #[error("Bonding curve service error: {0}")]
    Curve(#[from] CurveError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Transaction envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("Config creation failed: {0}")]
    ConfigBuilder(#[from] ConfigBuilderError),
}

impl OrchestratorError {
    /// Errors caused by the request itself rather than a collaborator
    pub fn is_user_error(&self) -> bool {
        matches!(self, OrchestratorError::Validation(_))
    }
}

/// Launch settings that do not change per request
#[derive(Debug, Clone, Default)]
pub struct LaunchSettings {
    /// Configuration used when the caller names none
    pub default_config: Option<Pubkey>,
    /// Create a fresh configuration for each token that carries a supply
    pub create_config_per_token: bool,
    /// Metadata URI used when the caller sends none
    pub default_uri: String,
}

/// Pool-creation transaction awaiting the caller's signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPool {
    /// Base64 transaction, signed by the generated mint only
    pub transaction: String,
    pub base_mint: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTokenOutcome {
    pub token_data: TokenSummary,
    pub config_address: Pubkey,
    pub pool: Option<PreparedPool>,
}

pub struct TokenCreationOrchestrator {
    curve: Arc<dyn BondingCurvePort>,
    ledger: Arc<dyn LedgerPort>,
    config_builder: Option<ConfigBuilder>,
    settings: LaunchSettings,
}

impl TokenCreationOrchestrator {
    pub fn new(
        curve: Arc<dyn BondingCurvePort>,
        ledger: Arc<dyn LedgerPort>,
        settings: LaunchSettings,
    ) -> Self {
        Self {
            curve,
            ledger,
            config_builder: None,
            settings,
        }
    }

    /// Enable server-side config creation
    pub fn with_config_builder(mut self, builder: ConfigBuilder) -> Self {
        self.config_builder = Some(builder);
        self
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    /// Validate a submitted form and prepare whatever the caller needs next
    pub async fn create_token(&self, form: TokenForm) -> Result<CreateTokenOutcome, OrchestratorError> {
        let descriptor = form.validate()?;
        tracing::info!(
            "Token request: {} ({}) supply={:?} wallet={:?}",
            descriptor.name,
            descriptor.symbol,
            descriptor.total_supply,
            descriptor.wallet_address
        );

        let config_address = self.resolve_config(&descriptor).await?;

        let pool = match descriptor.wallet_address {
            Some(wallet) => Some(self.prepare_pool(&descriptor, config_address, wallet).await?),
            None => None,
        };

        Ok(CreateTokenOutcome {
            token_data: descriptor.summary(),
            config_address,
            pool,
        })
    }

    /// Configuration for a request: explicit, freshly built, or the default
    pub async fn resolve_config(&self, descriptor: &TokenDescriptor) -> Result<Pubkey, OrchestratorError> {
        if let Some(config) = descriptor.config {
            return Ok(config);
        }

        if self.settings.create_config_per_token {
            if let (Some(builder), Some(supply)) = (&self.config_builder, descriptor.total_supply) {
                let created = builder.create_config(supply).await?;
                return Ok(created.address);
            }
        }

        self.settings
            .default_config
            .ok_or(OrchestratorError::NoConfiguration)
    }

    /// Build the pool-creation envelope for `wallet`, signed by a fresh mint
    pub async fn prepare_pool(
        &self,
        descriptor: &TokenDescriptor,
        config: Pubkey,
        wallet: Pubkey,
    ) -> Result<PreparedPool, OrchestratorError> {
        let mint = Keypair::new();
        let uri = descriptor
            .uri
            .clone()
            .unwrap_or_else(|| self.settings.default_uri.clone());

        let transaction = self
            .curve
            .create_pool(CreatePoolParams {
                base_mint: mint.pubkey(),
                config,
                name: descriptor.name.clone(),
                symbol: descriptor.symbol.clone(),
                uri,
                payer: wallet,
                pool_creator: wallet,
            })
            .await?;

        let mut envelope = TransactionEnvelope::for_fee_payer(transaction, &wallet)?;
        envelope.stamp_blockhash(self.ledger.get_latest_blockhash().await?);
        envelope.partial_sign(&[&mint])?;

        tracing::info!(
            "Prepared pool for mint {} under config {} (awaiting {} signature(s))",
            mint.pubkey(),
            config,
            envelope.missing_signers().len()
        );

        Ok(PreparedPool {
            transaction: envelope.to_base64()?,
            base_mint: mint.pubkey(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::solana::WalletManager;
    use crate::ports::bonding_curve::MockBondingCurvePort;
    use crate::ports::ledger::MockLedgerPort;
    use crate::ports::mocks::{MockCurveService, MockLedger};

    fn settings(default_config: Option<Pubkey>) -> LaunchSettings {
        LaunchSettings {
            default_config,
            create_config_per_token: false,
            default_uri: "https://example.com/default.json".to_string(),
        }
    }

    fn orchestrator(curve: MockCurveService, ledger: MockLedger, default: Option<Pubkey>) -> TokenCreationOrchestrator {
        TokenCreationOrchestrator::new(Arc::new(curve), Arc::new(ledger), settings(default))
    }

    #[tokio::test]
    async fn test_registration_only_uses_default_config() {
        let default = Pubkey::new_unique();
        let curve = MockCurveService::new();
        let orch = orchestrator(curve.clone(), MockLedger::new(), Some(default));

        let outcome = orch
            .create_token(TokenForm::new("Test", "TST", "1000000"))
            .await
            .unwrap();

        assert_eq!(outcome.config_address, default);
        assert_eq!(outcome.token_data.name, "Test");
        assert!(!outcome.token_data.has_image);
        assert!(outcome.pool.is_none());
        assert!(curve.pool_requests().is_empty());
    }

    #[tokio::test]
    async fn test_caller_config_wins() {
        let caller = Pubkey::new_unique();
        let orch = orchestrator(MockCurveService::new(), MockLedger::new(), Some(Pubkey::new_unique()));

        let form = TokenForm {
            name: Some("Test".into()),
            symbol: Some("TST".into()),
            config: Some(caller.to_string()),
            ..Default::default()
        };
        let outcome = orch.create_token(form).await.unwrap();
        assert_eq!(outcome.config_address, caller);
        assert_eq!(outcome.token_data.total_supply, None);
    }

    #[tokio::test]
    async fn test_no_configuration_is_service_error() {
        let orch = orchestrator(MockCurveService::new(), MockLedger::new(), None);
        let err = orch
            .create_token(TokenForm::new("Test", "TST", "5"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::NoConfiguration));
        assert!(!err.is_user_error());
    }

    #[tokio::test]
    async fn test_validation_error_is_user_error() {
        let orch = orchestrator(MockCurveService::new(), MockLedger::new(), Some(Pubkey::new_unique()));
        let err = orch
            .create_token(TokenForm::new("", "TST", "5"))
            .await
            .unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Missing required field: name");
    }

    #[tokio::test]
    async fn test_wallet_request_returns_envelope() {
        let config = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let curve = MockCurveService::new();
        let ledger = MockLedger::new();
        let orch = orchestrator(curve.clone(), ledger.clone(), Some(config));

        let outcome = orch
            .create_token(TokenForm::new("Test", "TST", "1000000").with_wallet(wallet.to_string()))
            .await
            .unwrap();
        let pool = outcome.pool.unwrap();

        let envelope = TransactionEnvelope::from_base64(&pool.transaction).unwrap();
        assert_eq!(envelope.fee_payer(), Some(&wallet));
        assert_eq!(envelope.recent_blockhash(), ledger.blockhash());
        assert_eq!(envelope.missing_signers(), vec![wallet]);

        let requests = curve.pool_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].base_mint, pool.base_mint);
        assert_eq!(requests[0].config, config);
        assert_eq!(requests[0].uri, "https://example.com/default.json");
    }

    #[tokio::test]
    async fn test_fee_payer_set_to_caller() {
        let wallet = Pubkey::new_unique();
        let service_payer = Pubkey::new_unique();
        let blockhash = solana_sdk::hash::Hash::new_unique();

        let mut curve = MockBondingCurvePort::new();
        curve.expect_create_pool().times(1).returning(move |params| {
            let ix = solana_sdk::system_instruction::create_account(
                &params.payer,
                &params.base_mint,
                1_461_600,
                82,
                &spl_token::id(),
            );
            Ok(solana_sdk::transaction::Transaction::new_with_payer(&[ix], Some(&service_payer)))
        });
        let mut ledger = MockLedgerPort::new();
        ledger
            .expect_get_latest_blockhash()
            .times(1)
            .returning(move || Ok(blockhash));

        let orch = TokenCreationOrchestrator::new(
            Arc::new(curve),
            Arc::new(ledger),
            settings(Some(Pubkey::new_unique())),
        );
        let outcome = orch
            .create_token(TokenForm::new("Test", "TST", "1").with_wallet(wallet.to_string()))
            .await
            .unwrap();

        let envelope = TransactionEnvelope::from_base64(&outcome.pool.unwrap().transaction).unwrap();
        assert_eq!(envelope.fee_payer(), Some(&wallet));
        assert_eq!(envelope.recent_blockhash(), blockhash);
        assert_eq!(envelope.missing_signers(), vec![wallet]);
        assert!(!envelope.transaction().message.account_keys.contains(&service_payer));
    }

    #[tokio::test]
    async fn test_curve_failure_is_service_error() {
        let orch = orchestrator(
            MockCurveService::new().failing_create(),
            MockLedger::new(),
            Some(Pubkey::new_unique()),
        );
        let err = orch
            .create_token(TokenForm::new("Test", "TST", "1").with_wallet(Pubkey::new_unique().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Curve(_)));
        assert!(!err.is_user_error());
    }

    #[tokio::test]
    async fn test_config_per_token() {
        let curve = MockCurveService::new();
        let ledger = MockLedger::new();
        let default = Pubkey::new_unique();
        let builder = ConfigBuilder::new(
            Arc::new(curve.clone()),
            Arc::new(ledger.clone()),
            WalletManager::new_random(),
        );
        let mut launch = settings(Some(default));
        launch.create_config_per_token = true;
        let orch = TokenCreationOrchestrator::new(Arc::new(curve.clone()), Arc::new(ledger.clone()), launch)
            .with_config_builder(builder);

        let outcome = orch
            .create_token(TokenForm::new("Test", "TST", "1000"))
            .await
            .unwrap();
        assert_ne!(outcome.config_address, default);
        assert_eq!(curve.config_requests()[0].config, outcome.config_address);
        assert_eq!(ledger.confirmed().len(), 1);
    }
}
