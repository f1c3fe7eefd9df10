//! CLI argument definitions for coinlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `coins` | List or search the asset catalog |
//! | `analyze` | Chart one asset with min/max statistics |
//! | `compare` | Overlay two assets on shared axes |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--base-url` | public API | CoinGecko API base URL |

use clap::{Args, Parser, Subcommand, ValueEnum};

use coinlens_core::DEFAULT_BASE_URL;

/// Cryptocurrency price comparison and analysis CLI.
///
/// Fetches price history from the CoinGecko public API and renders terminal
/// charts with min/max statistics.
#[derive(Debug, Parser)]
#[command(
    name = "coinlens",
    author,
    version,
    about = "Cryptocurrency price comparison and analysis"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// CoinGecko API base URL.
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output with charts.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List or search the asset catalog.
    ///
    /// # Examples
    ///
    ///   coinlens coins
    ///   coinlens coins bitcoin --limit 5
    Coins(CoinsArgs),

    /// Chart one asset and report its min/max over a window.
    ///
    /// # Examples
    ///
    ///   coinlens analyze bitcoin
    ///   coinlens analyze ethereum --window 1m
    Analyze(AnalyzeArgs),

    /// Overlay two assets on shared axes.
    ///
    /// # Examples
    ///
    ///   coinlens compare bitcoin ethereum
    ///   coinlens compare solana cardano --window 5y
    Compare(CompareArgs),
}

/// Arguments for the `coins` command.
#[derive(Debug, Args)]
pub struct CoinsArgs {
    /// Optional case-insensitive name filter.
    pub query: Option<String>,

    /// Maximum number of entries to print.
    #[arg(long, default_value_t = 25)]
    pub limit: usize,
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Asset display name (case-insensitive), e.g. "Bitcoin".
    pub name: String,

    /// Lookback window: 1w, 1m, 1y, 5y (or "1 Week" etc).
    #[arg(long, default_value = "1y")]
    pub window: String,
}

/// Arguments for the `compare` command.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First asset display name.
    pub first: String,

    /// Second asset display name.
    pub second: String,

    /// Lookback window: 1w, 1m, 1y, 5y (or "1 Week" etc).
    #[arg(long, default_value = "1w")]
    pub window: String,
}
