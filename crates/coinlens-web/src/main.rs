mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use coinlens_core::{CoinGeckoClient, ReqwestHttpClient, RequestPacer, DEFAULT_BASE_URL};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

/// Outbound request budget against the public API free tier.
const REQUESTS_PER_SECOND: u32 = 1;

/// Interactive cryptocurrency price dashboard.
#[derive(Debug, Parser)]
#[command(name = "coinlens-web", version, about = "coinlens price dashboard")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// CoinGecko API base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let client = CoinGeckoClient::new(Arc::new(ReqwestHttpClient::new()))
        .with_base_url(&args.base_url)
        .with_pacer(RequestPacer::new(REQUESTS_PER_SECOND));
    let state = AppState::new(client);

    let app = routes::router(state).layer(CorsLayer::permissive());

    info!(bind = %args.bind, "dashboard listening");
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
