//! Asset publishing backends.
//!
//! The pipeline publishes encoded assets under deterministic storage keys and
//! gets back durable public URLs. The [`AssetStore`] trait abstracts the
//! destination; backends cover a local directory (served statically) and an
//! opaque HTTP publishing API.

pub mod factory;
pub mod http;
pub mod local;
pub mod traits;

pub use factory::create_store;
pub use http::HttpAssetStore;
pub use local::LocalAssetStore;
pub use traits::{AssetStore, StorageError, StorageResult};
