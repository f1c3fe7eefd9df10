pub mod analyze;
pub mod coins;
pub mod compare;

use coinlens_core::{CatalogCache, CoinGeckoClient};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Shared per-process state passed to every command.
pub struct AppContext {
    pub client: CoinGeckoClient,
    pub catalog: CatalogCache,
}

/// Result of one command: a JSON payload and its human rendering.
pub struct CommandOutput {
    pub json: Value,
    pub text: String,
}

pub async fn run(cli: &Cli, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    match &cli.command {
        Command::Coins(args) => coins::run(args, ctx).await,
        Command::Analyze(args) => analyze::run(args, ctx).await,
        Command::Compare(args) => compare::run(args, ctx).await,
    }
}
