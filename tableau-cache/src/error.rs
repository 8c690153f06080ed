//! Cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while loading an asset.
///
/// Cloneable so that every caller sharing one in-flight load receives the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The asset id is not registered in the catalog.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Fetching or decoding the asset failed.
    #[error("Failed to load asset {id}: {reason}")]
    LoadFailed {
        /// The asset that failed.
        id: String,
        /// What the fetcher reported.
        reason: String,
    },
}

/// Errors reported by an [`AssetFetcher`](crate::AssetFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading the payload failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The source locator cannot be used by this fetcher.
    #[error("Invalid asset source: {0}")]
    InvalidSource(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Transport(String),
}
