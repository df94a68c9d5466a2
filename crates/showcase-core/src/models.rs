//! Domain models for submissions and pipeline results.

use crate::slot::{ImageSlot, MAX_GALLERY_SLOTS};
use crate::slug::normalize_slug;
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// One community's intake record, validated and normalized.
///
/// Only the extractor constructs these, and only when at least one image
/// reference is present. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub display_name: String,
    pub normalized_slug: String,
    /// External correlation key. May be empty.
    pub submission_id: String,
    /// May be empty.
    pub contact_email: String,
    pub hero_image: Option<Url>,
    pub logo_image: Option<Url>,
    /// At most [`MAX_GALLERY_SLOTS`] entries.
    pub gallery_images: Vec<Url>,
}

impl Submission {
    /// Build a submission, deriving the slug from the display name.
    /// Returns `None` when no image reference is present.
    pub fn new(
        display_name: String,
        submission_id: String,
        contact_email: String,
        hero_image: Option<Url>,
        logo_image: Option<Url>,
        mut gallery_images: Vec<Url>,
    ) -> Option<Self> {
        gallery_images.truncate(MAX_GALLERY_SLOTS as usize);
        if hero_image.is_none() && logo_image.is_none() && gallery_images.is_empty() {
            return None;
        }
        let normalized_slug = normalize_slug(&display_name);
        Some(Submission {
            display_name,
            normalized_slug,
            submission_id,
            contact_email,
            hero_image,
            logo_image,
            gallery_images,
        })
    }

    /// Populated slots in processing order: hero, logo, gallery-1..4.
    pub fn populated_slots(&self) -> Vec<(ImageSlot, &Url)> {
        let mut slots = Vec::new();
        if let Some(ref url) = self.hero_image {
            slots.push((ImageSlot::Hero, url));
        }
        if let Some(ref url) = self.logo_image {
            slots.push((ImageSlot::Logo, url));
        }
        for (i, url) in self
            .gallery_images
            .iter()
            .take(MAX_GALLERY_SLOTS as usize)
            .enumerate()
        {
            slots.push((ImageSlot::Gallery(i as u8 + 1), url));
        }
        slots
    }

    pub fn identity(&self) -> SubmissionIdentity {
        SubmissionIdentity {
            display_name: self.display_name.clone(),
            normalized_slug: self.normalized_slug.clone(),
            submission_id: self.submission_id.clone(),
            contact_email: self.contact_email.clone(),
        }
    }
}

/// Identity fields carried through to the submission result.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionIdentity {
    pub display_name: String,
    pub normalized_slug: String,
    pub submission_id: String,
    pub contact_email: String,
}

/// Output of one successful slot transform.
#[derive(Debug, Clone, Serialize)]
pub struct AssetResult {
    pub source_url: String,
    pub published_url: String,
    pub storage_key: String,
    pub filename: String,
    pub alt_text: String,
    pub width: u32,
    pub height: u32,
    pub slot: ImageSlot,
}

/// Aggregate outcome for one submission across all attempted slots.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub identity: SubmissionIdentity,
    /// Successful transforms only, in slot order.
    pub assets: Vec<AssetResult>,
    /// One entry per failed slot, keyed by role name.
    pub slot_errors: BTreeMap<String, String>,
    /// `None` when reconciliation was not configured or no slot succeeded.
    pub reconciliation: Option<ReconciliationOutcome>,
}

impl SubmissionResult {
    pub fn new(identity: SubmissionIdentity) -> Self {
        SubmissionResult {
            identity,
            assets: Vec::new(),
            slot_errors: BTreeMap::new(),
            reconciliation: None,
        }
    }

    /// Whether any slot transform succeeded.
    pub fn has_assets(&self) -> bool {
        !self.assets.is_empty()
    }
}

/// Raw record fetched from the external record store: an opaque identifier
/// plus named fields.
#[derive(Debug, Clone, serde::Deserialize, Serialize)]
pub struct ExternalRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of reconciling one submission against the external record store.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationOutcome {
    pub matched: bool,
    pub external_record_id: Option<String>,
    pub fields_updated: usize,
    pub message: String,
}

impl ReconciliationOutcome {
    pub fn matched(record_id: String, fields_updated: usize) -> Self {
        ReconciliationOutcome {
            matched: true,
            external_record_id: Some(record_id),
            fields_updated,
            message: format!("updated {} fields", fields_updated),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ReconciliationOutcome {
            matched: false,
            external_record_id: None,
            fields_updated: 0,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn submission_requires_an_image() {
        let none = Submission::new(
            "Empty Town".into(),
            String::new(),
            String::new(),
            None,
            None,
            vec![],
        );
        assert!(none.is_none());

        let some = Submission::new(
            "Logo Town".into(),
            String::new(),
            String::new(),
            None,
            Some(url("https://img.example/logo.png")),
            vec![],
        )
        .unwrap();
        assert_eq!(some.normalized_slug, "logo-town");
    }

    #[test]
    fn gallery_capped_at_four() {
        let gallery: Vec<Url> = (0..6)
            .map(|i| url(&format!("https://img.example/g{}.jpg", i)))
            .collect();
        let sub = Submission::new(
            "Big Gallery".into(),
            String::new(),
            String::new(),
            None,
            None,
            gallery,
        )
        .unwrap();
        assert_eq!(sub.gallery_images.len(), 4);
    }

    #[test]
    fn populated_slots_in_fixed_order() {
        let sub = Submission::new(
            "Ordered".into(),
            String::new(),
            String::new(),
            Some(url("https://img.example/h.jpg")),
            Some(url("https://img.example/l.png")),
            vec![url("https://img.example/g1.jpg"), url("https://img.example/g2.jpg")],
        )
        .unwrap();

        let slots: Vec<ImageSlot> = sub.populated_slots().iter().map(|(s, _)| *s).collect();
        assert_eq!(
            slots,
            vec![
                ImageSlot::Hero,
                ImageSlot::Logo,
                ImageSlot::Gallery(1),
                ImageSlot::Gallery(2),
            ]
        );
    }

    #[test]
    fn populated_slots_skips_absent_roles() {
        let sub = Submission::new(
            "Gallery Only".into(),
            String::new(),
            String::new(),
            None,
            None,
            vec![url("https://img.example/g1.jpg")],
        )
        .unwrap();
        let slots: Vec<ImageSlot> = sub.populated_slots().iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, vec![ImageSlot::Gallery(1)]);
    }
}
