//! Launchpad Session
//!
//! State behind the two launchpad views: the pool list for one configuration
//! and the token creation form. Creating a token goes all the way to ledger
//! confirmation before the session reports success.

use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::solana::{WalletError, WalletManager};
use crate::domain::{EnvelopeError, PoolRecord, TokenForm, TransactionEnvelope};
use crate::ports::{LedgerError, LedgerPort};
use super::orchestrator::{OrchestratorError, TokenCreationOrchestrator};
use super::pool_query::PoolQueryAdapter;

/// Form fields accepted by the create view
pub const FORM_FIELDS: [&str; 5] = ["name", "symbol", "totalSupply", "uri", "config"];

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("Connect a wallet before creating a token")]
    WalletNotConnected,
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
    #[error("No pool transaction was prepared")]
    MissingTransaction,
    #[error("Transaction envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl LaunchpadError {
    pub fn is_user_error(&self) -> bool {
        match self {
            LaunchpadError::WalletNotConnected | LaunchpadError::UnknownField(_) => true,
            LaunchpadError::Orchestrator(e) => e.is_user_error(),
            _ => false,
        }
    }
}

/// Which view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Create,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::List => View::Create,
            View::Create => View::List,
        }
    }
}

/// Create-view form state, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    fields: BTreeMap<&'static str, String>,
    image: Option<String>,
}

impl CreateForm {
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), LaunchpadError> {
        let key = FORM_FIELDS
            .iter()
            .find(|f| **f == field)
            .ok_or_else(|| LaunchpadError::UnknownField(field.to_string()))?;
        self.fields.insert(*key, value.into());
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Attach an image by file name
    pub fn set_image(&mut self, file_name: impl Into<String>) {
        self.image = Some(file_name.into());
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.image = None;
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.image.is_none()
    }

    /// Request body for the orchestrator
    pub fn to_token_form(&self, wallet_address: Option<String>) -> TokenForm {
        let field = |name: &str| self.get(name).map(str::to_string);
        TokenForm {
            name: field("name"),
            symbol: field("symbol"),
            total_supply: field("totalSupply"),
            config: field("config"),
            uri: field("uri"),
            wallet_address,
            image: self.image.clone(),
        }
    }
}

/// A token launched from this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedToken {
    /// Base mint address
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: Option<String>,
    pub pool_signature: String,
    pub created_at: DateTime<Utc>,
}

pub struct Launchpad {
    orchestrator: Arc<TokenCreationOrchestrator>,
    pool_query: Arc<PoolQueryAdapter>,
    ledger: Arc<dyn LedgerPort>,
    config: String,
    wallet: Option<WalletManager>,
    view: View,
    form: CreateForm,
    pools: Vec<PoolRecord>,
    list_error: Option<String>,
    launched: Vec<LaunchedToken>,
    refresh: u64,
    synced_at: Option<u64>,
}

impl Launchpad {
    /// Session browsing pools under `config`
    pub fn new(
        orchestrator: Arc<TokenCreationOrchestrator>,
        pool_query: Arc<PoolQueryAdapter>,
        ledger: Arc<dyn LedgerPort>,
        config: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            pool_query,
            ledger,
            config: config.into(),
            wallet: None,
            view: View::List,
            form: CreateForm::default(),
            pools: Vec::new(),
            list_error: None,
            launched: Vec::new(),
            refresh: 0,
            synced_at: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_list(&mut self) {
        self.view = View::List;
    }

    pub fn show_create(&mut self) {
        self.view = View::Create;
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
    }

    pub fn connect_wallet(&mut self, wallet: WalletManager) {
        tracing::info!("Wallet connected: {}", wallet.public_key());
        self.wallet = Some(wallet);
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet = None;
    }

    pub fn wallet(&self) -> Option<&WalletManager> {
        self.wallet.as_ref()
    }

    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateForm {
        &mut self.form
    }

    pub fn pools(&self) -> &[PoolRecord] {
        &self.pools
    }

    /// Error from the last list refresh, if it failed
    pub fn list_error(&self) -> Option<&str> {
        self.list_error.as_deref()
    }

    /// Tokens launched this session, newest first
    pub fn launched(&self) -> &[LaunchedToken] {
        &self.launched
    }

    pub fn refresh_signal(&self) -> u64 {
        self.refresh
    }

    pub fn request_refresh(&mut self) {
        self.refresh += 1;
    }

    /// Reload the pool list on first use or after the refresh signal changed.
    /// Returns whether a reload happened.
    pub async fn sync_list(&mut self) -> bool {
        if self.synced_at == Some(self.refresh) {
            return false;
        }

        match self.pool_query.list_pools(Some(&self.config)).await {
            Ok(listing) => {
                self.list_error = listing.error.clone();
                self.pools = listing.pools;
            }
            Err(e) => {
                self.list_error = Some(e.to_string());
                self.pools = Vec::new();
            }
        }
        self.synced_at = Some(self.refresh);
        true
    }

    /// Create a token from the form, sign with the connected wallet, and wait for confirmation
    pub async fn submit(&mut self) -> Result<LaunchedToken, LaunchpadError> {
        let wallet = self.wallet.as_ref().ok_or(LaunchpadError::WalletNotConnected)?;
        let form = self.form.to_token_form(Some(wallet.public_key()));

        let outcome = self.orchestrator.create_token(form).await?;
        let pool = outcome.pool.ok_or(LaunchpadError::MissingTransaction)?;

        let mut envelope = TransactionEnvelope::from_base64(&pool.transaction)?;
        wallet.sign_envelope(&mut envelope)?;

        let signature = self.ledger.send_raw_transaction(&envelope.to_bytes()?).await?;
        tracing::info!("Pool transaction sent: {}", signature);
        self.ledger.confirm_transaction(&signature).await?;

        let token = LaunchedToken {
            id: pool.base_mint.to_string(),
            name: outcome.token_data.name,
            symbol: outcome.token_data.symbol,
            total_supply: outcome.token_data.total_supply,
            pool_signature: signature.to_string(),
            created_at: Utc::now(),
        };
        tracing::info!("Token {} ({}) launched at {}", token.name, token.symbol, token.id);

        self.launched.insert(0, token.clone());
        self.form.clear();
        self.view = View::List;
        self.request_refresh();

        Ok(token)
    }
}
