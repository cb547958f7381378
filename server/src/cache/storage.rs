use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;

/// One cached response body plus the content type it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub content_type: String,
    pub body: Bytes,
}

/// A single named cache: request path to stored asset.
///
/// Concurrent writers to the same path are last-write-wins; bodies for a
/// given path are expected to be identical.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: DashMap<String, StoredAsset>,
}

impl AssetCache {
    pub fn put(&self, path: &str, asset: StoredAsset) {
        self.entries.insert(path.to_string(), asset);
    }

    pub fn get(&self, path: &str) -> Option<StoredAsset> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Registry of named caches, one generation of each kind live at a time.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: DashMap<String, Arc<AssetCache>>,
}

impl CacheStorage {
    /// Get the cache under `name`, creating it empty if absent.
    pub fn open(&self, name: &str) -> Arc<AssetCache> {
        self.caches.entry(name.to_string()).or_default().clone()
    }

    /// Names of every cache currently held.
    pub fn keys(&self) -> Vec<String> {
        self.caches.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Drop the cache under `name` and everything in it.
    pub fn delete(&self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// Look `path` up across `names` in order, first hit wins.
    pub fn match_path(&self, names: &[&str], path: &str) -> Option<StoredAsset> {
        names.iter().find_map(|name| {
            self.caches
                .get(*name)
                .and_then(|cache| cache.get(path))
        })
    }
}
