//! Process-lifetime catalog cache.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::coingecko::CoinGeckoClient;
use crate::domain::AssetCatalog;
use crate::error::FetchError;

/// Explicit single-entry, time-unbounded store for the asset catalog.
///
/// Constructed once at process start and passed to callers; repeated calls
/// within the same process return the cached catalog without re-issuing the
/// request. The interaction model is one request at a time, so concurrent
/// misses are not coordinated; if two do race, the last write wins and both
/// observe a well-formed catalog.
#[derive(Clone, Default)]
pub struct CatalogCache {
    slot: Arc<RwLock<Option<Arc<AssetCatalog>>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch(
        &self,
        client: &CoinGeckoClient,
    ) -> Result<Arc<AssetCatalog>, FetchError> {
        if let Some(catalog) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let assets = client.catalog().await?;
        let catalog = Arc::new(AssetCatalog::from_assets(assets));
        for name in catalog.collisions() {
            warn!(name, "duplicate case-folded asset name skipped");
        }

        *self.slot.write().await = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Drops the cached catalog so the next call re-fetches.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
