//! Config Builder
//!
//! Creates bonding-curve configurations signed by the server wallet. The curve
//! service builds the transaction; this side adds the blockhash, both
//! signatures, and waits for the ledger to confirm it.

use std::sync::Arc;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use thiserror::Error;

use crate::adapters::solana::WalletManager;
use crate::domain::{CurveParams, CurveParamsError, EnvelopeError, TransactionEnvelope};
use crate::ports::{BondingCurvePort, CreateConfigParams, CurveError, LedgerError, LedgerPort};

#[derive(Debug, Error)]
pub enum ConfigBuilderError {
    #[error("Invalid curve parameters: {0}")]
    InvalidCurve(#[from] CurveParamsError),
    #[error("Bonding curve service error: {0}")]
    Curve(#[from] CurveError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Transaction envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// A configuration that landed on the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedConfig {
    pub address: Pubkey,
    pub signature: Signature,
}

pub struct ConfigBuilder {
    curve: Arc<dyn BondingCurvePort>,
    ledger: Arc<dyn LedgerPort>,
    wallet: WalletManager,
    template: CurveParams,
}

impl ConfigBuilder {
    /// Builder using the stock launchpad curve
    pub fn new(
        curve: Arc<dyn BondingCurvePort>,
        ledger: Arc<dyn LedgerPort>,
        wallet: WalletManager,
    ) -> Self {
        Self {
            curve,
            ledger,
            wallet,
            template: CurveParams::launchpad_defaults(0),
        }
    }

    /// Use curve settings from configuration. The supply is replaced per call.
    pub fn with_template(mut self, template: CurveParams) -> Self {
        self.template = template;
        self
    }

    /// Server wallet address (payer, fee claimer and leftover receiver)
    pub fn authority(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    /// Curve parameters for a given supply
    pub fn params_for(&self, total_supply: u64) -> Result<CurveParams, ConfigBuilderError> {
        let mut params = self.template.clone();
        params.total_token_supply = total_supply;
        params.validate()?;
        Ok(params)
    }

    /// Create, sign, submit and confirm a new configuration
    pub async fn create_config(&self, total_supply: u64) -> Result<CreatedConfig, ConfigBuilderError> {
        let curve = self.params_for(total_supply)?;
        let config_keypair = Keypair::new();
        let authority = self.authority();

        tracing::info!(
            "Creating config {} for supply {} (authority {})",
            config_keypair.pubkey(),
            total_supply,
            authority
        );

        let transaction = self
            .curve
            .create_config(CreateConfigParams {
                config: config_keypair.pubkey(),
                fee_claimer: authority,
                leftover_receiver: authority,
                payer: authority,
                quote_mint: spl_token::native_mint::id(),
                curve,
            })
            .await?;

        let mut envelope = TransactionEnvelope::for_fee_payer(transaction, &authority)?;
        envelope.stamp_blockhash(self.ledger.get_latest_blockhash().await?);
        envelope.partial_sign(&[&config_keypair, self.wallet.signer()])?;

        let signature = self.ledger.send_raw_transaction(&envelope.to_bytes()?).await?;
        tracing::debug!("Config transaction sent: {}", signature);

        self.ledger.confirm_transaction(&signature).await?;
        tracing::info!("Config {} confirmed ({})", config_keypair.pubkey(), signature);

        Ok(CreatedConfig {
            address: config_keypair.pubkey(),
            signature,
        })
    }
}
