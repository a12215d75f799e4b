//! Command implementations

pub mod blend;
pub mod simulate;
pub mod skeleton;

use std::path::Path;

use anim_pose::{AssetCache, JsonAssetLoader};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Asset cache rooted at `dir`
pub(crate) fn open_cache(dir: &Path) -> Result<AssetCache<JsonAssetLoader>> {
    if !dir.is_dir() {
        anyhow::bail!("Asset directory not found: {}", dir.display());
    }
    log::info!("Loading assets from {}", dir.display());
    Ok(AssetCache::new(JsonAssetLoader::new(dir)))
}

/// Read a JSON document that is not an asset, like a blend request or a signal script
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
