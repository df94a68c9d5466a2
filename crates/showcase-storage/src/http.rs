//! HTTP publishing backend.
//!
//! Publishes assets to an opaque path-addressed publishing API: a PUT of the
//! raw encoded bytes to `{endpoint}/{key}` that returns a durable public URL.
//! If the response body carries a JSON `url` field that URL wins; otherwise
//! the addressed URL itself is returned.

use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpAssetStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpAssetStore {
    pub fn new(
        endpoint: String,
        token: Option<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(HttpAssetStore {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn key_url(&self, storage_key: &str) -> StorageResult<String> {
        if storage_key.is_empty() || storage_key.starts_with('/') || storage_key.contains("..") {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(format!("{}/{}", self.endpoint, storage_key))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn publish(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let url = self.key_url(storage_key)?;

        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::PublishFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::PublishFailed(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        // The publishing API may return the canonical public URL in its body.
        let published_url = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("url")
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| url.clone()),
            Err(_) => url.clone(),
        };

        tracing::debug!(key = storage_key, url = %published_url, "Published asset");
        Ok(published_url)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let url = self.key_url(storage_key)?;

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        if !response.status().is_success() {
            return Err(StorageError::DownloadFailed(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let url = self.key_url(storage_key)?;

        let response = self
            .authorize(self.client.head(&url))
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_keys() {
        let store = HttpAssetStore::new(
            "https://cdn.example/publish".to_string(),
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        for key in ["../x.jpg", "/x.jpg", ""] {
            assert!(store.key_url(key).is_err(), "key {key:?}");
        }
        assert_eq!(
            store.key_url("town-hero.jpg").unwrap(),
            "https://cdn.example/publish/town-hero.jpg"
        );
    }
}
