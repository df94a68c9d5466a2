//! Pipeline orchestration: per-submission slot processing with failure
//! isolation, record-store reconciliation, and bulk export.

pub mod export;
pub mod orchestrator;
pub mod reconcile;
pub mod store;

pub use export::export_archive;
pub use orchestrator::PipelineOrchestrator;
pub use reconcile::RecordReconciler;
pub use store::{AirtableStore, RecordStore};
