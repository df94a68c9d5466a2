//! Per-slot image transformation: fetch, decode, resize, re-encode, publish.

pub mod encode;
pub mod fetch;
pub mod resize;
pub mod transform;

pub use fetch::ImageFetcher;
pub use transform::{AssetTransform, SlotTransformer, TransformRequest};
