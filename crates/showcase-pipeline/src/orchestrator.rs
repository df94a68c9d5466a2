//! Pipeline orchestration with per-slot failure isolation.
//!
//! Submissions are processed in input order; within one submission the
//! populated slots run concurrently up to a bounded permit count so the
//! publishing endpoint is never saturated. A failed slot is recorded on the
//! result and never aborts sibling slots, later submissions, or the batch.

use crate::reconcile::RecordReconciler;
use futures::future::join_all;
use showcase_core::{
    ReconcileError, ReconciliationOutcome, SlotProfiles, Submission, SubmissionResult,
};
use showcase_processing::{SlotTransformer, TransformRequest};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct PipelineOrchestrator {
    transformer: Arc<dyn SlotTransformer>,
    /// `None` when record-store credentials are absent; reconciliation is
    /// then skipped entirely.
    reconciler: Option<RecordReconciler>,
    profiles: SlotProfiles,
    max_concurrent_slots: usize,
}

impl PipelineOrchestrator {
    pub fn new(
        transformer: Arc<dyn SlotTransformer>,
        reconciler: Option<RecordReconciler>,
        profiles: SlotProfiles,
        max_concurrent_slots: usize,
    ) -> Self {
        PipelineOrchestrator {
            transformer,
            reconciler,
            profiles,
            max_concurrent_slots: max_concurrent_slots.max(1),
        }
    }

    /// Process every submission, in order. Always returns one result per
    /// submission, including fully failed ones.
    pub async fn run(&self, submissions: &[Submission]) -> Vec<SubmissionResult> {
        let mut results = Vec::with_capacity(submissions.len());
        for submission in submissions {
            results.push(self.run_one(submission).await);
        }
        results
    }

    async fn run_one(&self, submission: &Submission) -> SubmissionResult {
        let mut result = SubmissionResult::new(submission.identity());
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_slots));

        let attempts = submission.populated_slots().into_iter().map(|(slot, url)| {
            let request = TransformRequest {
                source_url: url.clone(),
                slot,
                profile: self.profiles.for_slot(slot),
                display_name: submission.display_name.clone(),
                normalized_slug: submission.normalized_slug.clone(),
            };
            let transformer = Arc::clone(&self.transformer);
            let semaphore = Arc::clone(&semaphore);
            async move {
                // The semaphore is never closed, so a failed acquire cannot
                // happen; proceeding without a permit is still safe.
                let _permit = semaphore.acquire().await.ok();
                (slot, transformer.transform(&request).await)
            }
        });

        // join_all preserves slot order in the output.
        for (slot, outcome) in join_all(attempts).await {
            match outcome {
                Ok(asset) => result.assets.push(asset),
                Err(e) => {
                    tracing::warn!(
                        slug = %submission.normalized_slug,
                        slot = %slot,
                        error = %e,
                        "Slot transform failed"
                    );
                    result.slot_errors.insert(slot.role(), e.to_string());
                }
            }
        }

        // Fully failed submissions are reported but never reconciled.
        if result.has_assets() {
            if let Some(ref reconciler) = self.reconciler {
                result.reconciliation = Some(match reconciler.reconcile(&result).await {
                    Ok(outcome) => outcome,
                    Err(e @ ReconcileError::NoMatch) => {
                        tracing::warn!(
                            slug = %submission.normalized_slug,
                            "No matching external record"
                        );
                        ReconciliationOutcome::failed(e.to_string())
                    }
                    Err(e) => {
                        tracing::warn!(
                            slug = %submission.normalized_slug,
                            error = %e,
                            "Reconciliation failed"
                        );
                        ReconciliationOutcome::failed(e.to_string())
                    }
                });
            }
        }

        result
    }
}
