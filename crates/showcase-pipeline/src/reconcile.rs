//! Record reconciliation: re-locate the originating record and patch in the
//! published asset fields.

use crate::store::RecordStore;
use serde_json::{Map, Value};
use showcase_core::{
    ExternalRecord, FieldSchema, GalleryFieldMode, ImageSlot, ReconcileError,
    ReconciliationOutcome, SubmissionIdentity, SubmissionResult,
};
use std::sync::Arc;

/// Matches a pipeline result back to its external record and applies a
/// partial field update. Failures here never invalidate published assets.
pub struct RecordReconciler {
    store: Arc<dyn RecordStore>,
    schema: FieldSchema,
}

impl RecordReconciler {
    pub fn new(store: Arc<dyn RecordStore>, schema: FieldSchema) -> Self {
        RecordReconciler { store, schema }
    }

    /// Locate the matching record and write back published URLs, alt texts,
    /// and the status marker. Only successful slots are written.
    pub async fn reconcile(
        &self,
        result: &SubmissionResult,
    ) -> Result<ReconciliationOutcome, ReconcileError> {
        let record = self.locate(&result.identity).await?;
        let fields = self.build_update(result);
        let count = fields.len();

        self.store.update(&record.id, fields).await?;

        tracing::info!(
            record_id = %record.id,
            slug = %result.identity.normalized_slug,
            fields = count,
            "Reconciled submission"
        );
        Ok(ReconciliationOutcome::matched(record.id, count))
    }

    /// Ordered fallback chain, stopping at the first hit: correlation id
    /// (when non-blank), then display name, then normalized slug.
    async fn locate(
        &self,
        identity: &SubmissionIdentity,
    ) -> Result<ExternalRecord, ReconcileError> {
        let submission_id = identity.submission_id.trim();
        if !submission_id.is_empty() {
            if let Some(record) = self
                .store
                .search_first(&self.schema.submission_id, submission_id)
                .await?
            {
                return Ok(record);
            }
        }

        if let Some(record) = self
            .store
            .search_first(&self.schema.display_name, &identity.display_name)
            .await?
        {
            return Ok(record);
        }

        if let Some(record) = self
            .store
            .search_first(&self.schema.slug, &identity.normalized_slug)
            .await?
        {
            return Ok(record);
        }

        Err(ReconcileError::NoMatch)
    }

    /// Build the partial-field patch from successful slots only. Slots that
    /// errored are never written; fields outside the map stay untouched.
    fn build_update(&self, result: &SubmissionResult) -> Map<String, Value> {
        let mut fields = Map::new();
        let mut gallery_urls: Vec<Value> = Vec::new();

        for asset in &result.assets {
            match (asset.slot, self.schema.gallery_mode) {
                (ImageSlot::Gallery(_), GalleryFieldMode::Grouped) => {
                    gallery_urls.push(Value::String(asset.published_url.clone()));
                }
                _ => {
                    fields.insert(
                        self.schema.url_field(asset.slot),
                        Value::String(asset.published_url.clone()),
                    );
                    fields.insert(
                        self.schema.alt_field(asset.slot),
                        Value::String(asset.alt_text.clone()),
                    );
                }
            }
        }

        if !gallery_urls.is_empty() {
            fields.insert(
                self.schema.gallery_aggregate.clone(),
                Value::Array(gallery_urls),
            );
        }

        // Status marker is unconditional on a successful match.
        fields.insert(
            self.schema.status.clone(),
            Value::String(self.schema.status_value.clone()),
        );
        fields.insert(
            self.schema.updated_at.clone(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        fields
    }
}
