use thiserror::Error;

use crate::http_client::HttpError;

/// Validation errors for domain values parsed from user input or wire data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid window '{value}', expected one of 1w, 1m, 1y, 5y")]
    UnknownWindow { value: String },

    #[error("timestamp {millis}ms is outside the representable range")]
    TimestampOutOfRange { millis: i64 },

    #[error("unknown asset '{name}'")]
    UnknownAsset { name: String },
}

/// Failure modes of the fetch pipeline.
///
/// `RateLimited` mirrors the upstream behavior of the public CoinGecko API:
/// when the free-tier quota is exceeded the catalog endpoint returns an error
/// object instead of the expected asset array.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limit exceeded: catalog response was not a list of assets")]
    RateLimited,

    #[error("no price data returned for the requested window")]
    EmptySeries,

    #[error("network error: {0}")]
    Transport(#[from] HttpError),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Stable machine-readable code used by the web surface.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::EmptySeries => "empty_series",
            Self::Transport(_) => "network",
            Self::Status { .. } => "upstream_status",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}
