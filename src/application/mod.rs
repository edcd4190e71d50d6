pub mod orchestrator;
pub mod pool_query;
pub mod config_builder;
pub mod launchpad;

pub use orchestrator::{
    CreateTokenOutcome, LaunchSettings, OrchestratorError, PreparedPool, TokenCreationOrchestrator,
};
pub use pool_query::PoolQueryAdapter;
pub use config_builder::{ConfigBuilder, ConfigBuilderError, CreatedConfig};
pub use launchpad::{CreateForm, LaunchedToken, Launchpad, LaunchpadError, View, FORM_FIELDS};
