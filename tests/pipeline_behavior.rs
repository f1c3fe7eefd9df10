//! Behavior-driven tests for the price pipeline
//!
//! These tests verify WHAT a user interaction can accomplish end to end,
//! driven through a canned transport so everything runs offline.

use coinlens_tests::*;

// =============================================================================
// Catalog: well-formed responses
// =============================================================================

#[tokio::test]
async fn user_sees_one_lookup_entry_per_case_folded_name() {
    // Given: a catalog where two assets share a case-folded name
    let canned = Arc::new(
        CannedHttpClient::new()
            .with_response("/coins/list", HttpResponse::ok_json(catalog_body())),
    );
    let client = client_with(&canned);
    let cache = CatalogCache::new();

    // When: the catalog is fetched
    let catalog = cache.get_or_fetch(&client).await.expect("well-formed catalog");

    // Then: the duplicate is dropped, first occurrence wins, and the
    // collision is observable
    assert_eq!(catalog.len(), 2, "one entry per distinct case-folded name");
    assert_eq!(
        catalog.resolve("BITCOIN").map(|a| a.id.as_str()),
        Some("bitcoin")
    );
    assert_eq!(catalog.collisions(), ["BITCOIN"]);
}

#[tokio::test]
async fn repeated_interactions_reuse_the_cached_catalog() {
    // Given: a populated catalog cache
    let canned = Arc::new(
        CannedHttpClient::new()
            .with_response("/coins/list", HttpResponse::ok_json(catalog_body())),
    );
    let client = client_with(&canned);
    let cache = CatalogCache::new();
    cache.get_or_fetch(&client).await.expect("first fetch");

    // When: three more interactions resolve assets
    for _ in 0..3 {
        let catalog = cache.get_or_fetch(&client).await.expect("cached");
        assert!(catalog.resolve("ethereum").is_some());
    }

    // Then: only one outbound call was ever issued
    assert_eq!(canned.request_count(), 1);
}

// =============================================================================
// Catalog: rate-limit signal
// =============================================================================

#[tokio::test]
async fn malformed_catalog_surfaces_rate_limit_and_stops_the_pipeline() {
    // Given: the upstream answers the catalog request with an error object
    let canned = Arc::new(CannedHttpClient::new().with_response(
        "/coins/list",
        HttpResponse::ok_json(r#"{"status":{"error_code":429,"error_message":"quota"}}"#),
    ));
    let client = client_with(&canned);
    let cache = CatalogCache::new();

    // When: the interaction tries to build its selection list
    let err = cache.get_or_fetch(&client).await.expect_err("rate limited");

    // Then: the failure is the rate-limit taxonomy entry and no further
    // fetches were attempted
    assert!(matches!(err, FetchError::RateLimited));
    assert_eq!(canned.request_count(), 1, "no series fetch after catalog failure");
}

// =============================================================================
// Series: window mapping and empty data
// =============================================================================

#[tokio::test]
async fn window_labels_map_to_the_documented_day_counts() {
    // Given: a transport recording every issued URL
    let canned = Arc::new(CannedHttpClient::new().with_response(
        "/market_chart",
        HttpResponse::ok_json(r#"{"prices":[[1700000000000,42000.0]]}"#),
    ));
    let client = client_with(&canned);

    // When: the user selects "1 Week" and then "5 Years"
    let week: Window = "1 Week".parse().expect("label parses");
    let five_years: Window = "5 Years".parse().expect("label parses");
    client.market_chart("bitcoin", week).await.expect("fetches");
    client.market_chart("bitcoin", five_years).await.expect("fetches");

    // Then: the query parameters carry 7 and 1825 days
    let requests = canned.requests();
    assert!(requests[0].contains("days=7"), "got {}", requests[0]);
    assert!(requests[1].contains("days=1825"), "got {}", requests[1]);
    assert!(requests.iter().all(|u| u.contains("vs_currency=usd")));
}

#[tokio::test]
async fn empty_price_data_becomes_a_warning_not_a_chart() {
    // Given: a well-formed but empty prices array
    let canned = Arc::new(
        CannedHttpClient::new()
            .with_response("/market_chart", HttpResponse::ok_json(r#"{"prices":[]}"#)),
    );
    let client = client_with(&canned);

    // When: the series is fetched
    let err = client
        .market_chart("bitcoin", Window::OneWeek)
        .await
        .expect_err("no data");

    // Then: the empty-data state is distinct from a transport failure, so
    // the presenter can warn instead of charting
    assert!(matches!(err, FetchError::EmptySeries));
}

#[tokio::test]
async fn transport_failure_propagates_to_the_interaction() {
    // Given: a transport with no route for the series endpoint
    let canned = Arc::new(CannedHttpClient::new());
    let client = client_with(&canned);

    // When: the fetch runs
    let err = client
        .market_chart("bitcoin", Window::OneMonth)
        .await
        .expect_err("transport failure");

    // Then: the network taxonomy entry surfaces unretried
    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(canned.request_count(), 1, "no retry was attempted");
}

// =============================================================================
// Presenter statistics
// =============================================================================

#[tokio::test]
async fn comparison_fetches_both_series_sequentially_and_summarizes() {
    // Given: two assets with price history
    let canned = Arc::new(
        CannedHttpClient::new()
            .with_response("/coins/list", HttpResponse::ok_json(catalog_body()))
            .with_response(
                "/coins/bitcoin/market_chart",
                HttpResponse::ok_json(
                    r#"{"prices":[[1700000000000,10.0],[1700086400000,30.0],[1700172800000,5.0]]}"#,
                ),
            )
            .with_response(
                "/coins/ethereum/market_chart",
                HttpResponse::ok_json(r#"{"prices":[[1700000000000,2.0],[1700086400000,2.0]]}"#),
            ),
    );
    let client = client_with(&canned);
    let cache = CatalogCache::new();

    // When: the comparison interaction resolves both selections and fetches
    let catalog = cache.get_or_fetch(&client).await.expect("catalog");
    let first = catalog.resolve("bitcoin").expect("known").clone();
    let second = catalog.resolve("ethereum").expect("known").clone();
    let first_series = client
        .market_chart(&first.id, Window::OneWeek)
        .await
        .expect("series");
    let second_series = client
        .market_chart(&second.id, Window::OneWeek)
        .await
        .expect("series");

    // Then: statistics follow stable argmax/argmin semantics
    let first_summary = summarize(&first_series).expect("non-empty");
    assert_eq!(first_summary.max_price, 30.0);
    assert_eq!(first_summary.max_at.unix_millis(), 1_700_086_400_000);
    assert_eq!(first_summary.min_price, 5.0);

    // Ties resolve to the first occurrence
    let second_summary = summarize(&second_series).expect("non-empty");
    assert_eq!(second_summary.max_at.unix_millis(), 1_700_000_000_000);

    // And: one catalog call plus two series calls, in order
    let requests = canned.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].contains("/coins/list"));
    assert!(requests[1].contains("/coins/bitcoin/"));
    assert!(requests[2].contains("/coins/ethereum/"));
}
