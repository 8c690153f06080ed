//! The transport seam: how raw asset payloads are obtained.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tableau_core::AssetMetadata;

use crate::FetchError;

/// Fetches and decodes the payload for an asset.
///
/// The cache calls this once per load; any error becomes a load failure for
/// the requested id.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the payload for `metadata.source`.
    async fn fetch(&self, metadata: &AssetMetadata) -> Result<Vec<u8>, FetchError>;
}

/// Reads payloads from files below a root directory.
///
/// `metadata.source` is interpreted as a relative path under the root.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Create a fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory sources are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a source below the root, rejecting anything that escapes it.
    fn resolve(&self, source: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(source);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if source.is_empty() || escapes {
            return Err(FetchError::InvalidSource(source.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetFetcher for FsFetcher {
    async fn fetch(&self, metadata: &AssetMetadata) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(&metadata.source)?;
        tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Produces an empty payload for every asset.
///
/// Useful when only metadata matters, e.g. laying out scenes before the
/// real content is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFetcher;

#[async_trait]
impl AssetFetcher for PlaceholderFetcher {
    async fn fetch(&self, _metadata: &AssetMetadata) -> Result<Vec<u8>, FetchError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use tableau_core::Category;

    use super::*;

    fn meta(source: &str) -> AssetMetadata {
        AssetMetadata::new("bg_beach", Category::Background, "png", 3, source)
    }

    #[tokio::test]
    async fn test_fs_fetcher_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("background")).expect("mkdir");
        std::fs::write(dir.path().join("background/bg_beach.png"), [1u8, 2, 3]).expect("write");

        let fetcher = FsFetcher::new(dir.path());
        let payload = fetcher
            .fetch(&meta("background/bg_beach.png"))
            .await
            .expect("fetch");
        assert_eq!(payload, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fs_fetcher_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = FsFetcher::new(dir.path());
        let result = fetcher.fetch(&meta("background/missing.png")).await;
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }

    #[tokio::test]
    async fn test_fs_fetcher_rejects_escaping_sources() {
        let fetcher = FsFetcher::new("/srv/assets");
        for source in ["../secret.png", "/etc/passwd", "ui/../../x.png", ""] {
            let result = fetcher.fetch(&meta(source)).await;
            assert!(
                matches!(result, Err(FetchError::InvalidSource(_))),
                "{source:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_placeholder_fetcher() {
        let payload = PlaceholderFetcher
            .fetch(&meta("anything"))
            .await
            .expect("fetch");
        assert!(payload.is_empty());
    }
}
