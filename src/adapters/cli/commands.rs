//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the launchpad.

use clap::{Parser, Subcommand};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::bonding_curve::{CurveServiceClient, CurveServiceConfig};
use crate::adapters::http::{start_server, AppState};
use crate::adapters::solana::{SolanaClient, WalletManager};
use crate::adapters::token_metadata::{TokenMetadataClient, TokenMetadataConfig};
use crate::application::{
    ConfigBuilder, LaunchSettings, Launchpad, PoolQueryAdapter, TokenCreationOrchestrator,
};
use crate::config::{load_config, Config};
use crate::ports::{BondingCurvePort, LedgerPort, MetadataPort};

/// DBC Launchpad - Meteora Dynamic Bonding Curve token launcher
#[derive(Parser, Debug)]
#[command(
    name = "dbc-launchpad",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Create and browse Dynamic Bonding Curve token pools",
    long_about = "dbc-launchpad serves the launchpad API and launches tokens on \
                  Meteora Dynamic Bonding Curve pools from the command line."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/devnet.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve(ServeCmd),

    /// List pools under a configuration
    Pools(PoolsCmd),

    /// Create a new bonding curve configuration signed by the server wallet
    CreateConfig(CreateConfigCmd),

    /// Launch a token with the server wallet as creator
    Launch(LaunchCmd),
}

/// Start the HTTP API
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Override bind address
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// List pools
#[derive(Parser, Debug)]
pub struct PoolsCmd {
    /// Configuration address
    #[arg(value_name = "CONFIG")]
    pub config_address: String,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,
}

/// Create a configuration
#[derive(Parser, Debug)]
pub struct CreateConfigCmd {
    /// Total token supply the curve is built for
    #[arg(long, value_name = "AMOUNT")]
    pub total_supply: u64,
}

/// Launch a token
#[derive(Parser, Debug)]
pub struct LaunchCmd {
    /// Token name
    #[arg(long)]
    pub name: String,

    /// Token symbol
    #[arg(long)]
    pub symbol: String,

    /// Total supply (required unless a configuration is given)
    #[arg(long, value_name = "AMOUNT")]
    pub total_supply: Option<String>,

    /// Configuration to launch under
    #[arg(long, value_name = "ADDRESS")]
    pub config_address: Option<String>,

    /// Metadata URI
    #[arg(long)]
    pub uri: Option<String>,
}

/// Execute a parsed command line
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_config(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;

    init_logging(app.verbose, app.debug, &config.logging.level)?;
    tracing::debug!("Config: {}", app.config.display());

    match app.command {
        Command::Serve(cmd) => serve_command(cmd, &config).await,
        Command::Pools(cmd) => pools_command(cmd, &config).await,
        Command::CreateConfig(cmd) => create_config_command(cmd, &config).await,
        Command::Launch(cmd) => launch_command(cmd, &config).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        configured
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

/// Collaborators shared by every command
struct Components {
    ledger: Arc<dyn LedgerPort>,
    curve: Arc<dyn BondingCurvePort>,
    metadata: Arc<dyn MetadataPort>,
}

fn build_components(config: &Config) -> Result<Components> {
    let solana = SolanaClient::from_commitment_name(config.solana.get_rpc_url(), &config.solana.commitment)
        .context("Failed to create Solana client")?
        .with_confirm_timeout(config.solana.confirm_timeout());

    let curve = CurveServiceClient::with_config(CurveServiceConfig {
        api_base_url: config.curve_service.get_api_url(),
        api_key: config.curve_service.get_api_key(),
        timeout: config.curve_service.timeout(),
    })
    .context("Failed to create bonding curve service client")?;

    let metadata = TokenMetadataClient::with_config(TokenMetadataConfig {
        rpc_url: config.metadata_rpc_url(),
        timeout: config.metadata.timeout(),
    })
    .context("Failed to create metadata client")?;

    tracing::info!(
        "Ledger RPC: {} | Curve service: {}",
        solana.url(),
        curve.base_url()
    );

    Ok(Components {
        ledger: Arc::new(solana),
        curve: Arc::new(curve),
        metadata: Arc::new(metadata),
    })
}

fn launch_settings(config: &Config) -> Result<LaunchSettings> {
    Ok(LaunchSettings {
        default_config: config.launchpad.default_config_key()?,
        create_config_per_token: config.launchpad.create_config_per_token,
        default_uri: config.launchpad.default_uri.clone(),
    })
}

fn config_builder(components: &Components, wallet: WalletManager, config: &Config) -> ConfigBuilder {
    ConfigBuilder::new(components.curve.clone(), components.ledger.clone(), wallet)
        .with_template(config.curve.params_for(0))
}

fn build_orchestrator(components: &Components, config: &Config, wallet: Option<WalletManager>) -> Result<TokenCreationOrchestrator> {
    let settings = launch_settings(config)?;
    let create_per_token = settings.create_config_per_token;
    let mut orchestrator =
        TokenCreationOrchestrator::new(components.curve.clone(), components.ledger.clone(), settings);

    if create_per_token {
        let wallet = match wallet {
            Some(wallet) => wallet,
            None => load_wallet_with_context(&config.solana.get_keypair_path())?,
        };
        orchestrator = orchestrator.with_config_builder(config_builder(components, wallet, config));
    }

    Ok(orchestrator)
}

/// Handle serve command
async fn serve_command(cmd: ServeCmd, config: &Config) -> Result<()> {
    let components = build_components(config)?;
    let orchestrator = build_orchestrator(&components, config, None)?;

    if orchestrator.settings().default_config.is_none() && !orchestrator.settings().create_config_per_token {
        tracing::warn!("No default configuration set; requests must name a config");
    }

    let state = AppState::new(
        Arc::new(orchestrator),
        Arc::new(PoolQueryAdapter::new(components.curve.clone(), components.metadata.clone())),
    );

    let bind = cmd.bind.unwrap_or_else(|| config.server.bind_address.clone());
    tracing::info!("Starting dbc-launchpad API on {}", bind);
    start_server(state, &bind).await
}

/// Handle pools command
async fn pools_command(cmd: PoolsCmd, config: &Config) -> Result<()> {
    let components = build_components(config)?;
    let adapter = PoolQueryAdapter::new(components.curve, components.metadata);

    let listing = adapter
        .list_pools(Some(&cmd.config_address))
        .await
        .context("Invalid configuration address")?;

    if cmd.format == "json" {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if !listing.success {
        bail!(
            "Failed to list pools: {}",
            listing.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    println!("Config: {}", cmd.config_address);
    println!("Pools: {}", listing.total_pools);
    for pool in &listing.pools {
        println!(
            "  #{:<3} {:<10} {:<32} pool={} mint={} base={} quote={}{}",
            pool.pool_index,
            pool.symbol,
            pool.name,
            pool.pool_address,
            pool.base_mint_address,
            pool.base_supply,
            pool.quote_supply,
            if pool.is_migrated { " (migrated)" } else { "" }
        );
    }

    Ok(())
}

/// Handle create-config command
async fn create_config_command(cmd: CreateConfigCmd, config: &Config) -> Result<()> {
    let components = build_components(config)?;
    let wallet = load_wallet_with_context(&config.solana.get_keypair_path())?;
    let builder = config_builder(&components, wallet, config);

    println!("Creating config for supply {} (authority {})", cmd.total_supply, builder.authority());
    let created = builder
        .create_config(cmd.total_supply)
        .await
        .context("Failed to create configuration")?;

    println!("Config: {}", created.address);
    println!("Signature: {}", created.signature);
    Ok(())
}

/// Handle launch command
async fn launch_command(cmd: LaunchCmd, config: &Config) -> Result<()> {
    let components = build_components(config)?;
    let wallet = load_wallet_with_context(&config.solana.get_keypair_path())?;
    let orchestrator = build_orchestrator(&components, config, Some(wallet.clone()))?;

    let browse_config = cmd
        .config_address
        .clone()
        .or_else(|| config.launchpad.default_config.clone())
        .unwrap_or_default();

    let mut session = Launchpad::new(
        Arc::new(orchestrator),
        Arc::new(PoolQueryAdapter::new(components.curve.clone(), components.metadata.clone())),
        components.ledger.clone(),
        browse_config,
    );
    session.connect_wallet(wallet);
    session.show_create();

    let form = session.form_mut();
    form.set("name", cmd.name)?;
    form.set("symbol", cmd.symbol)?;
    if let Some(supply) = cmd.total_supply {
        form.set("totalSupply", supply)?;
    }
    if let Some(config_address) = cmd.config_address {
        form.set("config", config_address)?;
    }
    if let Some(uri) = cmd.uri {
        form.set("uri", uri)?;
    }

    let token = session.submit().await.context("Token launch failed")?;

    println!("Launched {} ({})", token.name, token.symbol);
    println!("Mint: {}", token.id);
    println!("Signature: {}", token.pool_signature);

    session.sync_list().await;
    if let Some(error) = session.list_error() {
        tracing::warn!("Could not refresh pool list: {}", error);
    } else {
        println!("Pools under config: {}", session.pools().len());
    }

    Ok(())
}

/// Load wallet with helpful error messages
fn load_wallet_with_context(keypair_path: &str) -> Result<WalletManager> {
    let path = Path::new(keypair_path);

    if !path.exists() {
        bail!(
            "Wallet file not found: {}\n\n\
             The server wallet signs configurations and CLI launches.\n\n\
             To create a new wallet, run:\n  \
             solana-keygen new --outfile {}\n\n\
             Or update 'keypair_path' in your config file",
            keypair_path,
            keypair_path
        );
    }

    WalletManager::from_file(keypair_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load wallet from '{}': {}\n\n\
             Expected a solana-keygen JSON byte array or a base58 secret key",
            keypair_path,
            e
        )
    })
}
