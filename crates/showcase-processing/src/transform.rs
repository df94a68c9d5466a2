//! AssetTransform: one source image in, one published web asset out.

use crate::encode::{encode_jpeg, OUTPUT_CONTENT_TYPE, OUTPUT_EXTENSION};
use crate::fetch::ImageFetcher;
use crate::resize::fit_within;
use async_trait::async_trait;
use image::{GenericImageView, ImageReader};
use showcase_core::slug::titlecase_slug;
use showcase_core::{AssetResult, ImageSlot, SlotError, SlotProfile};
use showcase_storage::AssetStore;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One slot's transform request.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub source_url: Url,
    pub slot: ImageSlot,
    pub profile: SlotProfile,
    pub display_name: String,
    pub normalized_slug: String,
}

/// Seam the orchestrator drives; lets tests substitute fakes for the
/// network-and-pixels implementation.
#[async_trait]
pub trait SlotTransformer: Send + Sync {
    async fn transform(&self, request: &TransformRequest) -> Result<AssetResult, SlotError>;
}

/// Production transformer: fetch, decode, resize, re-encode, publish.
///
/// Idempotent for a given (source, slot, name): the storage key is derived
/// deterministically, so a re-run overwrites rather than duplicates.
pub struct AssetTransform {
    fetcher: ImageFetcher,
    store: Arc<dyn AssetStore>,
}

impl AssetTransform {
    pub fn new(store: Arc<dyn AssetStore>, download_timeout: Duration) -> Result<Self, SlotError> {
        Ok(AssetTransform {
            fetcher: ImageFetcher::new(download_timeout)?,
            store,
        })
    }
}

#[async_trait]
impl SlotTransformer for AssetTransform {
    async fn transform(&self, request: &TransformRequest) -> Result<AssetResult, SlotError> {
        tracing::debug!(
            slot = %request.slot,
            source = %request.source_url,
            "Transforming slot image"
        );

        let raw = self.fetcher.fetch(&request.source_url).await?;
        let (encoded, width, height) = process_image(&raw, request.profile)?;

        let filename = asset_filename(&request.normalized_slug, request.slot);
        let published_url = self
            .store
            .publish(&filename, OUTPUT_CONTENT_TYPE, encoded)
            .await
            .map_err(|e| SlotError::Publish(e.to_string()))?;

        tracing::info!(
            slot = %request.slot,
            key = %filename,
            width,
            height,
            "Published asset"
        );

        Ok(AssetResult {
            source_url: request.source_url.to_string(),
            published_url,
            storage_key: filename.clone(),
            filename,
            alt_text: request
                .slot
                .alt_text(&asset_name(&request.display_name, &request.normalized_slug)),
            width,
            height,
            slot: request.slot,
        })
    }
}

/// Decode, constrain to the profile's long edge, and re-encode.
/// Pure function of the input bytes and profile.
pub fn process_image(data: &[u8], profile: SlotProfile) -> Result<(Vec<u8>, u32, u32), SlotError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| SlotError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| SlotError::Decode(e.to_string()))?;

    let resized = fit_within(img, profile.max_dimension);
    let (width, height) = resized.dimensions();
    let encoded = encode_jpeg(&resized, profile.quality)?;

    Ok((encoded, width, height))
}

/// Deterministic storage key / filename for a slot asset.
pub fn asset_filename(normalized_slug: &str, slot: ImageSlot) -> String {
    let stem = if normalized_slug.is_empty() {
        "submission"
    } else {
        normalized_slug
    };
    format!("{}-{}.{}", stem, slot.role(), OUTPUT_EXTENSION)
}

/// Name used in alt text: the display name when present, otherwise the slug
/// re-titlecased.
fn asset_name(display_name: &str, normalized_slug: &str) -> String {
    if display_name.trim().is_empty() {
        titlecase_slug(normalized_slug)
    } else {
        display_name.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use showcase_storage::LocalAssetStore;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([9, 90, 200])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap()
            .dimensions()
    }

    #[test]
    fn process_resizes_oversized_source() {
        let profile = SlotProfile {
            max_dimension: 400,
            quality: 80,
        };
        let (encoded, width, height) = process_image(&png_bytes(800, 600), profile).unwrap();
        assert_eq!((width, height), (400, 300));
        assert_eq!(decoded_dimensions(&encoded), (400, 300));
    }

    #[test]
    fn process_never_upscales() {
        let profile = SlotProfile {
            max_dimension: 1600,
            quality: 85,
        };
        let (_, width, _) = process_image(&png_bytes(200, 100), profile).unwrap();
        assert!(width <= 200);
    }

    #[test]
    fn process_rejects_garbage_bytes() {
        let profile = SlotProfile {
            max_dimension: 400,
            quality: 80,
        };
        let err = process_image(b"definitely not an image", profile).unwrap_err();
        assert!(matches!(err, SlotError::Decode(_)));
    }

    #[test]
    fn filenames_are_deterministic() {
        assert_eq!(
            asset_filename("rust-belt-makers", ImageSlot::Hero),
            "rust-belt-makers-hero.jpg"
        );
        assert_eq!(
            asset_filename("rust-belt-makers", ImageSlot::Gallery(3)),
            "rust-belt-makers-gallery-3.jpg"
        );
        assert_eq!(asset_filename("", ImageSlot::Logo), "submission-logo.jpg");
    }

    #[test]
    fn asset_name_falls_back_to_titlecased_slug() {
        assert_eq!(asset_name("Rust Belt Makers", "rust-belt-makers"), "Rust Belt Makers");
        assert_eq!(asset_name("  ", "rust-belt-makers"), "Rust Belt Makers");
    }

    #[tokio::test]
    async fn transform_republish_overwrites_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalAssetStore::new(dir.path(), "http://localhost:3000/assets".to_string())
                .await
                .unwrap(),
        );

        // Publish through the store directly with the deterministic key the
        // transformer would use; a second publish must not create a sibling.
        let key = asset_filename("my-town", ImageSlot::Hero);
        store
            .publish(&key, OUTPUT_CONTENT_TYPE, png_bytes(10, 10))
            .await
            .unwrap();
        store
            .publish(&key, OUTPUT_CONTENT_TYPE, png_bytes(20, 20))
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
