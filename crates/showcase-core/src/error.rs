//! Error types module
//!
//! Failures in this pipeline are scoped: a slot failure belongs to one image
//! transform, a reconcile failure belongs to one submission, and only a
//! failure to obtain the input data at all is fatal to a run. The enums here
//! encode those scopes so callers cannot accidentally widen them.

/// Failure of a single image-slot transform.
///
/// Slot errors are recorded per slot in the submission result and never abort
/// sibling slots or other submissions.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Publish failed: {0}")]
    Publish(String),
}

/// Failure to reconcile one submission against the external record store.
///
/// Never fatal to already-published assets: the caller records the failure on
/// the submission result and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Record store credentials not configured")]
    NotConfigured,

    #[error("Record store query failed: {0}")]
    Search(String),

    #[error("No matching record found")]
    NoMatch,
}

/// Top-level failure reading the input source. The only hard failure of a
/// batch run.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Failed to read input source: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
