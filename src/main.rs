//! dbc-launchpad - Meteora Dynamic Bonding Curve launchpad
//!
//! Serves the launchpad API and launches tokens from the command line.

use anyhow::Result;

use dbc_launchpad::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
