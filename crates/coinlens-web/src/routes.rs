use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use coinlens_core::{summarize, Asset, Series, SeriesSummary, Window};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/assets", get(assets))
        .route("/api/analyze", get(analyze))
        .route("/api/compare", get(compare))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("assets/index.html"))
}

/// Catalog payload for the selection dropdowns.
async fn assets(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = state.catalog.get_or_fetch(&state.client).await?;
    let windows = Window::ALL
        .iter()
        .map(|w| json!({ "value": w, "label": w.label() }))
        .collect::<Vec<_>>();

    Ok(Json(json!({
        "assets": catalog.assets(),
        "windows": windows,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    asset: Option<String>,
    window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    asset: Asset,
    window: Window,
    summary: SeriesSummary,
    series: Series,
}

/// Single-asset analysis: series plus min/max statistics.
async fn analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let name = params
        .asset
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::warning("Please select a cryptocurrency."))?;
    let window = parse_window(params.window.as_deref())?;

    let (asset, series) = fetch_one(&state, name, window).await?;
    let summary = summarize(&series)?;

    info!(asset = %asset.id, days = window.days(), points = series.len(), "analyze rendered");
    Ok(Json(AnalyzeResponse {
        asset,
        window,
        summary,
        series,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    asset1: Option<String>,
    asset2: Option<String>,
    window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LabeledSeries {
    asset: Asset,
    series: Series,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    window: Window,
    series: Vec<LabeledSeries>,
}

/// Two-asset comparison for the shared-axes overlay chart.
async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<CompareResponse>, ApiError> {
    let (first, second) = match (
        params.asset1.as_deref().filter(|s| !s.trim().is_empty()),
        params.asset2.as_deref().filter(|s| !s.trim().is_empty()),
    ) {
        (Some(first), Some(second)) => (first, second),
        _ => return Err(ApiError::warning("Please select two cryptocurrencies.")),
    };
    let window = parse_window(params.window.as_deref())?;

    // Sequential fetches, one interaction at a time.
    let (first_asset, first_series) = fetch_one(&state, first, window).await?;
    let (second_asset, second_series) = fetch_one(&state, second, window).await?;

    info!(
        first = %first_asset.id,
        second = %second_asset.id,
        days = window.days(),
        "comparison rendered"
    );
    Ok(Json(CompareResponse {
        window,
        series: vec![
            LabeledSeries {
                asset: first_asset,
                series: first_series,
            },
            LabeledSeries {
                asset: second_asset,
                series: second_series,
            },
        ],
    }))
}

fn parse_window(value: Option<&str>) -> Result<Window, ApiError> {
    match value {
        None | Some("") => Ok(Window::OneYear),
        Some(raw) => raw.parse::<Window>().map_err(ApiError::from),
    }
}

async fn fetch_one(
    state: &AppState,
    name: &str,
    window: Window,
) -> Result<(Asset, Series), ApiError> {
    let catalog = state.catalog.get_or_fetch(&state.client).await?;
    let asset = catalog
        .resolve(name)
        .cloned()
        .ok_or_else(|| ApiError::from(coinlens_core::DomainError::UnknownAsset {
            name: name.to_owned(),
        }))?;

    let series = state.client.market_chart(&asset.id, window).await?;
    Ok((asset, series))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use coinlens_core::{CannedHttpClient, CoinGeckoClient, HttpClient, HttpResponse};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn state_with(canned: CannedHttpClient) -> AppState {
        AppState::new(
            CoinGeckoClient::new(Arc::new(canned) as Arc<dyn HttpClient>)
                .with_base_url("https://example.test/api/v3"),
        )
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("well-formed request"),
            )
            .await
            .expect("handler runs");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body reads")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[tokio::test]
    async fn analyze_without_a_selection_returns_a_warning_banner() {
        let (status, body) =
            get(state_with(CannedHttpClient::new()), "/api/analyze?window=1w").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "warning");
        assert_eq!(body["code"], "missing_selection");
        assert_eq!(body["message"], "Please select a cryptocurrency.");
    }

    #[tokio::test]
    async fn compare_with_one_selection_returns_a_warning_banner() {
        let (status, body) = get(
            state_with(CannedHttpClient::new()),
            "/api/compare?asset1=Bitcoin",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "warning");
        assert_eq!(body["code"], "missing_selection");
        assert_eq!(body["message"], "Please select two cryptocurrencies.");
    }

    #[tokio::test]
    async fn rate_limited_catalog_maps_to_an_error_body() {
        let canned = CannedHttpClient::new().with_response(
            "/coins/list",
            HttpResponse::ok_json(r#"{"status":{"error_code":429}}"#),
        );

        let (status, body) = get(state_with(canned), "/api/analyze?asset=Bitcoin").await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["kind"], "error");
        assert_eq!(body["code"], "rate_limited");
    }

    #[tokio::test]
    async fn transport_failure_maps_to_a_bad_gateway_error_body() {
        let canned = CannedHttpClient::new().with_response(
            "/coins/list",
            HttpResponse::ok_json(r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}]"#),
        );

        let (status, body) = get(state_with(canned), "/api/analyze?asset=Bitcoin").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "error");
        assert_eq!(body["code"], "network");
    }
}
