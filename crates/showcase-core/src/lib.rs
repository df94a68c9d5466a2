//! Core domain types for the showcase asset pipeline.
//!
//! This crate holds the shared vocabulary of the pipeline: submissions, image
//! slots, transform results, the error taxonomy, and environment-driven
//! configuration. It has no I/O of its own.

pub mod config;
pub mod error;
pub mod models;
pub mod slot;
pub mod slug;

pub use config::{
    FieldSchema, GalleryFieldMode, PipelineConfig, RecordStoreConfig, SlotProfiles,
    StorageBackendKind, StorageConfig,
};
pub use error::{BatchError, ReconcileError, SlotError};
pub use models::{
    AssetResult, ExternalRecord, ReconciliationOutcome, Submission, SubmissionIdentity,
    SubmissionResult,
};
pub use slot::{ImageSlot, SlotProfile};
