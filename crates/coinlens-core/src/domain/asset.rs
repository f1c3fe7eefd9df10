use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A tradable instrument identified by a stable id and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
}

impl Asset {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The fetched asset list plus a case-folded name lookup.
///
/// User selections carry display names; the lookup maps the lower-cased name
/// to the asset used as the fetch key. CoinGecko does not guarantee unique
/// case-folded names, so later duplicates are skipped (first occurrence wins)
/// and recorded as collisions rather than silently overwriting.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
    by_name: HashMap<String, usize>,
    collisions: Vec<String>,
}

impl AssetCatalog {
    pub fn from_assets(assets: Vec<Asset>) -> Self {
        let mut kept = Vec::with_capacity(assets.len());
        let mut by_name = HashMap::with_capacity(assets.len());
        let mut collisions = Vec::new();

        for asset in assets {
            let folded = asset.name.to_lowercase();
            match by_name.entry(folded) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(asset);
                }
                std::collections::hash_map::Entry::Occupied(_) => {
                    collisions.push(asset.name);
                }
            }
        }

        Self {
            assets: kept,
            by_name,
            collisions,
        }
    }

    /// Resolves a display name (case-folded) to its asset.
    pub fn resolve(&self, name: &str) -> Option<&Asset> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&index| &self.assets[index])
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Names that were dropped because their case-folded form was taken.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
