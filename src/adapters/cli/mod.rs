//! CLI Adapter
//!
//! `dbc-launchpad serve | pools | create-config | launch`. Each command loads
//! the TOML config, builds the Solana, curve service and metadata adapters,
//! and runs one application operation.

mod commands;

pub use commands::{execute, CliApp, Command, CreateConfigCmd, LaunchCmd, PoolsCmd, ServeCmd};

/// Parse process arguments
pub fn init() -> CliApp {
    <CliApp as clap::Parser>::parse()
}
