use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use super::storage::StoredAsset;

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// Where assets come from on a cache miss.
#[async_trait]
pub trait AssetOrigin: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<StoredAsset, OriginError>;
}

/// Serves the site directory from disk. `/` maps to `index.html`.
pub struct FsOrigin {
    root: PathBuf,
}

impl FsOrigin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, OriginError> {
        let trimmed = path.trim_start_matches('/');
        let relative = if trimmed.is_empty() { "index.html" } else { trimmed };

        // Request paths never get to walk out of the site directory.
        if relative
            .split('/')
            .any(|segment| segment.is_empty() || segment == ".." || segment == ".")
        {
            return Err(OriginError::NotFound(path.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetOrigin for FsOrigin {
    async fn fetch(&self, path: &str) -> Result<StoredAsset, OriginError> {
        let file = self.resolve(path)?;

        let body = match tokio::fs::read(&file).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(OriginError::NotFound(path.to_string()));
            }
            Err(e) => return Err(OriginError::Io(e)),
        };

        Ok(StoredAsset {
            content_type: content_type_of(&file),
            body,
        })
    }
}

fn content_type_of(file: &Path) -> String {
    mime_guess::from_path(file)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, FsOrigin) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>home</html>").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/style.min.css"), "body{}").unwrap();
        let origin = FsOrigin::new(dir.path());
        (dir, origin)
    }

    #[tokio::test]
    async fn root_path_serves_index_document() {
        let (_dir, origin) = site();

        let asset = origin.fetch("/").await.unwrap();

        assert_eq!(asset.content_type, "text/html");
        assert_eq!(asset.body, Bytes::from("<html>home</html>"));
    }

    #[tokio::test]
    async fn nested_asset_gets_its_content_type() {
        let (_dir, origin) = site();

        let asset = origin.fetch("/css/style.min.css").await.unwrap();

        assert_eq!(asset.content_type, "text/css");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, origin) = site();

        let err = origin.fetch("/nope.html").await.unwrap_err();

        assert!(matches!(err, OriginError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let (_dir, origin) = site();

        let err = origin.fetch("/../secrets.txt").await.unwrap_err();

        assert!(matches!(err, OriginError::NotFound(_)));
    }
}
