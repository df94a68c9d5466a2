//! Storage abstraction trait.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination store for published web assets.
///
/// Publishing the same key twice overwrites in place; re-running a transform
/// for the same submission and slot must never create a duplicate asset.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Publish encoded bytes under a storage key and return the durable
    /// public URL.
    async fn publish(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Fetch previously published bytes by storage key (bulk export support).
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether a key has been published.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
