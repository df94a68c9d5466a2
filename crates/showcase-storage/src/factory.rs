//! Config-driven backend construction.

use crate::{AssetStore, HttpAssetStore, LocalAssetStore, StorageError, StorageResult};
use showcase_core::config::{StorageBackendKind, StorageConfig};
use std::sync::Arc;
use std::time::Duration;

/// Create an asset store from configuration.
pub async fn create_store(
    config: &StorageConfig,
    publish_timeout: Duration,
) -> StorageResult<Arc<dyn AssetStore>> {
    match config.backend {
        StorageBackendKind::Local => {
            let base_path = config.local_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let store = LocalAssetStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }
        StorageBackendKind::Http => {
            let endpoint = config.http_endpoint.clone().ok_or_else(|| {
                StorageError::ConfigError("PUBLISH_ENDPOINT not configured".to_string())
            })?;

            let store = HttpAssetStore::new(endpoint, config.http_token.clone(), publish_timeout)?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_backend_requires_path_and_url() {
        let config = StorageConfig {
            backend: StorageBackendKind::Local,
            local_path: None,
            local_base_url: None,
            http_endpoint: None,
            http_token: None,
        };
        let err = create_store(&config, Duration::from_secs(5)).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn builds_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackendKind::Local,
            local_path: Some(dir.path().display().to_string()),
            local_base_url: Some("http://localhost:3000/assets".to_string()),
            http_endpoint: None,
            http_token: None,
        };
        assert!(create_store(&config, Duration::from_secs(5)).await.is_ok());
    }
}
