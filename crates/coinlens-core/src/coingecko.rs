//! CoinGecko public API client.
//!
//! Two endpoints back the whole pipeline:
//! - `GET {base}/coins/list`: full asset catalog
//! - `GET {base}/coins/{id}/market_chart?vs_currency=usd&days={n}`: price series
//!
//! The free tier signals an exceeded quota by answering the catalog request
//! with an error object instead of the expected array; that shape mismatch is
//! surfaced as `FetchError::RateLimited`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Asset, PricePoint, Series, UtcDateTime, Window};
use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::pacing::RequestPacer;

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for all series requests.
const VS_CURRENCY: &str = "usd";

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// Array of `[epoch_ms, price]` pairs.
    #[serde(default)]
    prices: Vec<(i64, f64)>,
}

/// Blocking-per-interaction CoinGecko client.
///
/// Each call issues one HTTP GET and waits for the response; there is no
/// retry layer, and a failed or malformed response propagates immediately.
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    pacer: Option<RequestPacer>,
}

impl CoinGeckoClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
            pacer: None,
        }
    }

    /// Overrides the API base URL; used by tests and self-hosted proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Fetches the full asset catalog.
    ///
    /// A body that is not a well-formed JSON array of asset records is the
    /// upstream's rate-limit signal and fails with `FetchError::RateLimited`.
    pub async fn catalog(&self) -> Result<Vec<Asset>, FetchError> {
        let url = format!("{}/coins/list", self.base_url);
        let response = self.execute(url).await?;

        let value: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|_| FetchError::RateLimited)?;
        if !value.is_array() {
            return Err(FetchError::RateLimited);
        }

        let entries: Vec<CatalogEntry> =
            serde_json::from_value(value).map_err(|_| FetchError::RateLimited)?;

        debug!(assets = entries.len(), "fetched asset catalog");
        Ok(entries
            .into_iter()
            .map(|entry| Asset::new(entry.id, entry.name))
            .collect())
    }

    /// Fetches the time-ordered price series for one asset over one window.
    pub async fn market_chart(&self, asset_id: &str, window: Window) -> Result<Series, FetchError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.base_url,
            urlencoding::encode(asset_id),
            VS_CURRENCY,
            window.days()
        );
        let response = self.execute(url).await?;

        let chart: MarketChartResponse =
            serde_json::from_str(&response.body).map_err(FetchError::from)?;

        if chart.prices.is_empty() {
            return Err(FetchError::EmptySeries);
        }

        let points = chart
            .prices
            .into_iter()
            .map(|(millis, price)| {
                UtcDateTime::from_unix_millis(millis)
                    .map(|timestamp| PricePoint::new(timestamp, price))
                    .map_err(|e| FetchError::Malformed(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(asset_id, days = window.days(), points = points.len(), "fetched price series");
        Ok(Series::new(points))
    }

    async fn execute(&self, url: String) -> Result<HttpResponse, FetchError> {
        if let Some(pacer) = &self.pacer {
            pacer.acquire().await;
        }

        let request = HttpRequest::get(url).with_header("accept", "application/json");
        let response = self.http.execute(request).await?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                body: truncate(&response.body, 200),
            });
        }

        Ok(response)
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        body.to_owned()
    } else {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::CannedHttpClient;

    fn client_with(canned: CannedHttpClient) -> CoinGeckoClient {
        CoinGeckoClient::new(Arc::new(canned)).with_base_url("https://example.test/api/v3")
    }

    #[tokio::test]
    async fn catalog_parses_a_well_formed_array() {
        let canned = CannedHttpClient::new().with_response(
            "/coins/list",
            HttpResponse::ok_json(r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}]"#),
        );

        let assets = client_with(canned).catalog().await.expect("well-formed");
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].name, "Bitcoin");
    }

    #[tokio::test]
    async fn catalog_object_body_is_a_rate_limit_signal() {
        let canned = CannedHttpClient::new().with_response(
            "/coins/list",
            HttpResponse::ok_json(r#"{"status":{"error_code":429}}"#),
        );

        let err = client_with(canned).catalog().await.expect_err("must fail");
        assert!(matches!(err, FetchError::RateLimited));
    }

    #[tokio::test]
    async fn market_chart_builds_the_expected_query() {
        let canned = CannedHttpClient::new().with_response(
            "/coins/bitcoin/market_chart",
            HttpResponse::ok_json(r#"{"prices":[[1700000000000,42000.5]]}"#),
        );
        let client = client_with(canned);

        let series = client
            .market_chart("bitcoin", Window::OneWeek)
            .await
            .expect("well-formed");
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].price, 42000.5);
    }

    #[tokio::test]
    async fn empty_prices_array_is_a_distinct_failure() {
        let canned = CannedHttpClient::new().with_response(
            "/market_chart",
            HttpResponse::ok_json(r#"{"prices":[]}"#),
        );

        let err = client_with(canned)
            .market_chart("bitcoin", Window::OneMonth)
            .await
            .expect_err("must fail");
        assert!(matches!(err, FetchError::EmptySeries));
    }

    #[tokio::test]
    async fn non_success_status_is_surfaced_with_body() {
        let canned = CannedHttpClient::new().with_response(
            "/market_chart",
            HttpResponse {
                status: 429,
                body: String::from("Throttled"),
            },
        );

        let err = client_with(canned)
            .market_chart("bitcoin", Window::OneYear)
            .await
            .expect_err("must fail");
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "Throttled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
