mod chart;
mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use coinlens_core::{CatalogCache, CoinGeckoClient, ReqwestHttpClient, RequestPacer};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::AppContext;
use crate::error::CliError;

/// Outbound request budget against the public API free tier.
const REQUESTS_PER_SECOND: u32 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let client = CoinGeckoClient::new(Arc::new(ReqwestHttpClient::new()))
        .with_base_url(&cli.base_url)
        .with_pacer(RequestPacer::new(REQUESTS_PER_SECOND));
    let ctx = AppContext {
        client,
        catalog: CatalogCache::new(),
    };

    let result = commands::run(&cli, &ctx).await?;
    output::render(&result, cli.format, cli.pretty)?;

    Ok(ExitCode::SUCCESS)
}
