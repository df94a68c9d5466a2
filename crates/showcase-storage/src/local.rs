//! Local filesystem backend.
//!
//! Publishes assets into a directory tree that is served statically; the
//! public URL is `{base_url}/{key}`.

use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

#[derive(Clone)]
pub struct LocalAssetStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    /// Create a new store rooted at `base_path`, served under `base_url`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetStore {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.starts_with('/')
            || storage_key.split('/').any(|part| part == "..")
        {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(self.base_path.join(storage_key))
    }

    fn key_to_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn publish(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Overwrites any previous asset at the same key.
        fs::write(&path, data).await.map_err(|e| {
            StorageError::PublishFailed(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(key = storage_key, path = %path.display(), "Published asset locally");
        Ok(self.key_to_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (tempfile::TempDir, LocalAssetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "http://localhost:3000/assets".to_string())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn publish_download_roundtrip() {
        let (_dir, store) = test_store().await;

        let url = store
            .publish("my-town-hero.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/assets/my-town-hero.jpg");

        assert!(store.exists("my-town-hero.jpg").await.unwrap());
        assert_eq!(store.download("my-town-hero.jpg").await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn publish_same_key_overwrites() {
        let (_dir, store) = test_store().await;

        store
            .publish("town-logo.jpg", "image/jpeg", vec![1])
            .await
            .unwrap();
        store
            .publish("town-logo.jpg", "image/jpeg", vec![2, 2])
            .await
            .unwrap();

        assert_eq!(store.download("town-logo.jpg").await.unwrap(), vec![2, 2]);
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let (_dir, store) = test_store().await;

        for key in ["../escape.jpg", "/abs.jpg", "a/../../b.jpg", ""] {
            let err = store.publish(key, "image/jpeg", vec![0]).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn download_missing_key_is_not_found() {
        let (_dir, store) = test_store().await;
        let err = store.download("absent.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
