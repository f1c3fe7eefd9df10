use coinlens_core::{CatalogCache, CoinGeckoClient};

/// Shared application state: the API client and the process-lifetime
/// catalog cache. The cache is the only mutable state the dashboard keeps.
#[derive(Clone)]
pub struct AppState {
    pub client: CoinGeckoClient,
    pub catalog: CatalogCache,
}

impl AppState {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self {
            client,
            catalog: CatalogCache::new(),
        }
    }
}
