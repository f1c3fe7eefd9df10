//! Core contracts for coinlens.
//!
//! This crate contains:
//! - Canonical domain models (assets, price series, lookback windows)
//! - The CoinGecko catalog/market-chart client
//! - The process-lifetime catalog cache
//! - Series statistics and structured errors

pub mod catalog;
pub mod coingecko;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pacing;
pub mod stats;

pub use catalog::CatalogCache;
pub use coingecko::{CoinGeckoClient, DEFAULT_BASE_URL};
pub use domain::{Asset, AssetCatalog, PricePoint, Series, UtcDateTime, Window};
pub use error::{DomainError, FetchError};
pub use http_client::{CannedHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use pacing::RequestPacer;
pub use stats::{summarize, SeriesSummary};
