//! Source image download.

use bytes::Bytes;
use showcase_core::SlotError;
use std::time::Duration;
use url::Url;

/// HTTP fetcher for source images. One client, per-call timeout; a timeout is
/// reported as the same download failure as an unreachable host.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, SlotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SlotError::Download(format!("HTTP client: {}", e)))?;
        Ok(ImageFetcher { client })
    }

    /// Fetch raw bytes from a source URL. Non-2xx responses are failures.
    pub async fn fetch(&self, source_url: &Url) -> Result<Bytes, SlotError> {
        let response = self
            .client
            .get(source_url.clone())
            .send()
            .await
            .map_err(|e| SlotError::Download(format!("{}: {}", source_url, e)))?;

        if !response.status().is_success() {
            return Err(SlotError::Download(format!(
                "{} returned {}",
                source_url,
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| SlotError::Download(format!("{}: {}", source_url, e)))
    }
}
