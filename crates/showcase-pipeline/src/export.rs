//! Bulk export of published assets as a ZIP archive.
//!
//! Convenience output only: one folder per submission, one entry per
//! published asset, bytes pulled back from the asset store.

use anyhow::{Context, Result};
use showcase_core::SubmissionResult;
use showcase_storage::AssetStore;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Sanitize an archive entry name to its base name, preventing path
/// traversal through crafted filenames.
fn sanitize_entry_name(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Package every published asset in `results` into a single ZIP archive.
pub async fn export_archive(
    store: Arc<dyn AssetStore>,
    results: &[SubmissionResult],
) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for result in results {
            let folder = if result.identity.normalized_slug.is_empty() {
                "submission".to_string()
            } else {
                result.identity.normalized_slug.clone()
            };

            for asset in &result.assets {
                let data = store
                    .download(&asset.storage_key)
                    .await
                    .with_context(|| format!("Failed to download asset: {}", asset.storage_key))?;

                let fallback = format!("{}-{}.jpg", folder, asset.slot);
                let entry = sanitize_entry_name(&asset.filename, &fallback);

                zip.start_file(format!("{}/{}", folder, entry), options)
                    .with_context(|| format!("Failed to add archive entry: {}", entry))?;
                zip.write_all(&data)
                    .with_context(|| format!("Failed to write archive entry: {}", entry))?;
            }
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{AssetResult, ImageSlot, SubmissionIdentity};
    use showcase_storage::LocalAssetStore;
    use std::io::Cursor;

    #[test]
    fn sanitizes_traversal_names() {
        assert_eq!(sanitize_entry_name("../../evil.jpg", "fb"), "evil.jpg");
        assert_eq!(sanitize_entry_name("..", "fb"), "fb");
        assert_eq!(sanitize_entry_name("plain.jpg", "fb"), "plain.jpg");
    }

    #[tokio::test]
    async fn archives_one_folder_per_submission() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalAssetStore::new(dir.path(), "http://localhost:3000/assets".to_string())
                .await
                .unwrap(),
        );
        store
            .publish("my-town-hero.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        store
            .publish("other-town-logo.jpg", "image/jpeg", vec![4, 5])
            .await
            .unwrap();

        let make_result = |name: &str, slug: &str, slot: ImageSlot| {
            let mut result = SubmissionResult::new(SubmissionIdentity {
                display_name: name.to_string(),
                normalized_slug: slug.to_string(),
                submission_id: String::new(),
                contact_email: String::new(),
            });
            result.assets.push(AssetResult {
                source_url: "https://img.example/src.jpg".to_string(),
                published_url: format!("http://localhost:3000/assets/{}-{}.jpg", slug, slot),
                storage_key: format!("{}-{}.jpg", slug, slot),
                filename: format!("{}-{}.jpg", slug, slot),
                alt_text: slot.alt_text(name),
                width: 1,
                height: 1,
                slot,
            });
            result
        };

        let results = vec![
            make_result("My Town", "my-town", ImageSlot::Hero),
            make_result("Other Town", "other-town", ImageSlot::Logo),
        ];

        let archive_bytes = export_archive(store, &results).await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).unwrap();

        assert!(archive.by_name("my-town/my-town-hero.jpg").is_ok());
        assert!(archive.by_name("other-town/other-town-logo.jpg").is_ok());
        assert_eq!(archive.len(), 2);
    }
}
