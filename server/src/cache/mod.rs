//! # Asset Cache
//!
//! Cache-first delivery of the static site.
//!
//! ## Layout
//!
//! - Static cache (`sachiva-static-v1`): fixed manifest of page documents
//!   and assets, populated once at install. Versioned by name; bump the
//!   name to ship a new generation.
//! - Dynamic cache (`sachiva-dynamic-v1`): populated at runtime from
//!   successful origin reads (write-through on read-miss).
//!
//! ## Lifecycle
//!
//! - Install: fetch every manifest URL from the origin and stage the
//!   results; nothing is registered unless every fetch succeeds, so a
//!   failed install leaves the previous generation serving.
//! - Activate: delete every cache whose name is neither the current static
//!   nor the current dynamic name. At most one live generation of each.
//! - Fetch: static and dynamic caches first, origin on a miss. A miss that
//!   the origin also cannot serve falls back to the cached root document
//!   for navigable requests.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

pub mod origin;
pub mod storage;

pub use origin::{AssetOrigin, FsOrigin, OriginError};
pub use storage::{AssetCache, CacheStorage, StoredAsset};

pub const STATIC_CACHE: &str = "sachiva-static-v1";
pub const DYNAMIC_CACHE: &str = "sachiva-dynamic-v1";

/// Every URL preloaded into the static cache at install.
pub const STATIC_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/contact.html",
    "/css/style.min.css",
    "/js/custom.min.js",
];

#[derive(Debug, Error)]
#[error("failed to cache {path}: {source}")]
pub struct InstallError {
    pub path: String,
    #[source]
    pub source: OriginError,
}

pub struct AssetCacheManager {
    storage: CacheStorage,
    origin: Arc<dyn AssetOrigin>,
    static_name: String,
    dynamic_name: String,
}

impl AssetCacheManager {
    pub fn new(origin: Arc<dyn AssetOrigin>) -> Self {
        Self::with_names(origin, STATIC_CACHE, DYNAMIC_CACHE)
    }

    pub fn with_names(origin: Arc<dyn AssetOrigin>, static_name: &str, dynamic_name: &str) -> Self {
        Self {
            storage: CacheStorage::default(),
            origin,
            static_name: static_name.to_string(),
            dynamic_name: dynamic_name.to_string(),
        }
    }

    /// Preload the static cache from the manifest, all or nothing.
    ///
    /// The manifest is staged in full before anything is registered, so an
    /// install that fails partway leaves existing caches untouched.
    pub async fn install(&self) -> Result<(), InstallError> {
        let mut staged = Vec::with_capacity(STATIC_MANIFEST.len());
        for path in STATIC_MANIFEST {
            match self.origin.fetch(path).await {
                Ok(asset) => staged.push((*path, asset)),
                Err(source) => {
                    return Err(InstallError {
                        path: path.to_string(),
                        source,
                    });
                }
            }
        }

        let cache = self.storage.open(&self.static_name);
        for (path, asset) in staged {
            cache.put(path, asset);
        }
        self.storage.open(&self.dynamic_name);

        info!(
            "Cached {} static assets into {}",
            cache.len(),
            self.static_name
        );
        Ok(())
    }

    /// Drop every cache generation other than the current two.
    pub fn activate(&self) {
        for name in self.storage.keys() {
            if name != self.static_name && name != self.dynamic_name {
                info!("Deleting stale cache {name}");
                self.storage.delete(&name);
            }
        }
    }

    /// Serve `path` cache-first.
    ///
    /// On a miss the origin is consulted and a successful read is stored
    /// into the dynamic cache before being returned. When the origin fails
    /// a navigable request, the cached root document stands in; anything
    /// else propagates the failure.
    pub async fn fetch(&self, path: &str, navigation: bool) -> Result<StoredAsset, OriginError> {
        if let Some(hit) = self.match_cached(path) {
            return Ok(hit);
        }

        match self.origin.fetch(path).await {
            Ok(asset) => {
                self.storage
                    .open(&self.dynamic_name)
                    .put(path, asset.clone());
                Ok(asset)
            }
            Err(err) => {
                if navigation {
                    if let Some(root) = self.match_cached("/") {
                        return Ok(root);
                    }
                }
                Err(err)
            }
        }
    }

    fn match_cached(&self, path: &str) -> Option<StoredAsset> {
        self.storage
            .match_path(&[&self.static_name, &self.dynamic_name], path)
    }

    /// Names of every cache currently registered.
    pub fn cache_names(&self) -> Vec<String> {
        self.storage.keys()
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }
}
