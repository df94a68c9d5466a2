//! Image slots and their transform profiles.

use serde::{Serialize, Serializer};
use std::fmt;

/// Maximum number of gallery images processed per submission.
pub const MAX_GALLERY_SLOTS: u8 = 4;

/// One image role within a submission.
///
/// Slots order deterministically: hero, logo, gallery-1..gallery-4. The
/// gallery index is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageSlot {
    Hero,
    Logo,
    Gallery(u8),
}

impl ImageSlot {
    /// Stable role name used in storage keys, error maps, and reports.
    pub fn role(&self) -> String {
        self.to_string()
    }

    /// Alt text for a published asset, derived only from the community name
    /// and the slot. Never free text.
    pub fn alt_text(&self, name: &str) -> String {
        match self {
            ImageSlot::Hero => format!("{} hero image", name),
            ImageSlot::Logo => format!("{} logo", name),
            ImageSlot::Gallery(_) => format!("{} group photo", name),
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSlot::Hero => write!(f, "hero"),
            ImageSlot::Logo => write!(f, "logo"),
            ImageSlot::Gallery(n) => write!(f, "gallery-{}", n),
        }
    }
}

impl Serialize for ImageSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Target sizing and quality for one slot's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotProfile {
    /// Upper bound on the long edge, in pixels. Sources smaller than this are
    /// never upscaled.
    pub max_dimension: u32,
    /// JPEG encode quality (0-100).
    pub quality: u8,
}

impl SlotProfile {
    pub const HERO: SlotProfile = SlotProfile {
        max_dimension: 1600,
        quality: 85,
    };
    pub const LOGO: SlotProfile = SlotProfile {
        max_dimension: 400,
        quality: 90,
    };
    pub const GALLERY: SlotProfile = SlotProfile {
        max_dimension: 1200,
        quality: 80,
    };
}
