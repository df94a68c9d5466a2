//! Configuration module
//!
//! All pipeline configuration comes from the environment at startup and is
//! threaded into components as explicit values. Components never read ambient
//! process state after construction, which keeps runs deterministic and lets
//! tests inject fake credentials and stores.

use crate::slot::{ImageSlot, SlotProfile};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_CONCURRENT_SLOTS: usize = 4;

/// Read a non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an environment variable, falling back to a default when
/// unset. A set-but-unparseable value is a configuration error.
fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow!("Invalid value for {}: {}", key, raw)),
        None => Ok(default),
    }
}

/// Which asset store backend to publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    Local,
    Http,
}

impl FromStr for StorageBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackendKind::Local),
            "http" => Ok(StorageBackendKind::Http),
            _ => Err(anyhow!("Unknown storage backend: {}", s)),
        }
    }
}

/// Asset store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    /// Local backend: root directory for published assets.
    pub local_path: Option<String>,
    /// Local backend: base URL files are served under.
    pub local_base_url: Option<String>,
    /// HTTP backend: publishing endpoint, keys are appended as path segments.
    pub http_endpoint: Option<String>,
    /// HTTP backend: optional bearer token.
    pub http_token: Option<String>,
}

/// External record store (Airtable-compatible) credentials.
///
/// Absence of these credentials means reconciliation is skipped entirely.
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    pub api_key: String,
    pub base_id: String,
    pub table: String,
    pub timeout: Duration,
}

/// How gallery assets are written back to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryFieldMode {
    /// One URL + alt-text field pair per gallery slot.
    Flat,
    /// One aggregate multi-value field holding all gallery URLs.
    #[default]
    Grouped,
}

impl FromStr for GalleryFieldMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(GalleryFieldMode::Flat),
            "grouped" => Ok(GalleryFieldMode::Grouped),
            _ => Err(anyhow!("Unknown gallery field mode: {}", s)),
        }
    }
}

/// Record-store field names the reconciler reads and writes.
///
/// The external schema differs between deployments, so the mapping is
/// configuration rather than code.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub submission_id: String,
    pub display_name: String,
    pub slug: String,
    pub hero_url: String,
    pub hero_alt: String,
    pub logo_url: String,
    pub logo_alt: String,
    pub gallery_mode: GalleryFieldMode,
    pub gallery_aggregate: String,
    pub status: String,
    pub status_value: String,
    pub updated_at: String,
}

impl Default for FieldSchema {
    fn default() -> Self {
        FieldSchema {
            submission_id: "Submission ID".to_string(),
            display_name: "Name".to_string(),
            slug: "Slug".to_string(),
            hero_url: "Hero Image URL".to_string(),
            hero_alt: "Hero Image Alt".to_string(),
            logo_url: "Logo URL".to_string(),
            logo_alt: "Logo Alt".to_string(),
            gallery_mode: GalleryFieldMode::default(),
            gallery_aggregate: "Gallery Images".to_string(),
            status: "Assets Status".to_string(),
            status_value: "published".to_string(),
            updated_at: "Assets Updated At".to_string(),
        }
    }
}

impl FieldSchema {
    /// Per-slot gallery URL field name, used in flat mode.
    pub fn gallery_url_field(&self, index: u8) -> String {
        format!("Gallery Image {} URL", index)
    }

    /// Per-slot gallery alt-text field name, used in flat mode.
    pub fn gallery_alt_field(&self, index: u8) -> String {
        format!("Gallery Image {} Alt", index)
    }

    /// URL field name for a slot.
    pub fn url_field(&self, slot: ImageSlot) -> String {
        match slot {
            ImageSlot::Hero => self.hero_url.clone(),
            ImageSlot::Logo => self.logo_url.clone(),
            ImageSlot::Gallery(n) => self.gallery_url_field(n),
        }
    }

    /// Alt-text field name for a slot.
    pub fn alt_field(&self, slot: ImageSlot) -> String {
        match slot {
            ImageSlot::Hero => self.hero_alt.clone(),
            ImageSlot::Logo => self.logo_alt.clone(),
            ImageSlot::Gallery(n) => self.gallery_alt_field(n),
        }
    }
}

/// Per-slot transform profiles.
#[derive(Debug, Clone, Copy)]
pub struct SlotProfiles {
    pub hero: SlotProfile,
    pub logo: SlotProfile,
    pub gallery: SlotProfile,
}

impl Default for SlotProfiles {
    fn default() -> Self {
        SlotProfiles {
            hero: SlotProfile::HERO,
            logo: SlotProfile::LOGO,
            gallery: SlotProfile::GALLERY,
        }
    }
}

impl SlotProfiles {
    pub fn for_slot(&self, slot: ImageSlot) -> SlotProfile {
        match slot {
            ImageSlot::Hero => self.hero,
            ImageSlot::Logo => self.logo,
            ImageSlot::Gallery(_) => self.gallery,
        }
    }

    fn from_env() -> Result<Self> {
        let defaults = SlotProfiles::default();
        Ok(SlotProfiles {
            hero: SlotProfile {
                max_dimension: env_parse("HERO_MAX_DIMENSION", defaults.hero.max_dimension)?,
                quality: env_parse("HERO_QUALITY", defaults.hero.quality)?,
            },
            logo: SlotProfile {
                max_dimension: env_parse("LOGO_MAX_DIMENSION", defaults.logo.max_dimension)?,
                quality: env_parse("LOGO_QUALITY", defaults.logo.quality)?,
            },
            gallery: SlotProfile {
                max_dimension: env_parse("GALLERY_MAX_DIMENSION", defaults.gallery.max_dimension)?,
                quality: env_parse("GALLERY_QUALITY", defaults.gallery.quality)?,
            },
        })
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub storage: StorageConfig,
    /// `None` when record-store credentials are absent.
    pub record_store: Option<RecordStoreConfig>,
    pub profiles: SlotProfiles,
    pub field_schema: FieldSchema,
    pub download_timeout: Duration,
    pub publish_timeout: Duration,
    pub max_concurrent_slots: usize,
}

impl PipelineConfig {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend: StorageBackendKind = env_parse("STORAGE_BACKEND", StorageBackendKind::Local)
            .context("STORAGE_BACKEND")?;
        let storage = StorageConfig {
            backend,
            local_path: env_opt("LOCAL_STORAGE_PATH"),
            local_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            http_endpoint: env_opt("PUBLISH_ENDPOINT"),
            http_token: env_opt("PUBLISH_TOKEN"),
        };

        let record_store = match (
            env_opt("AIRTABLE_API_KEY"),
            env_opt("AIRTABLE_BASE_ID"),
            env_opt("AIRTABLE_TABLE"),
        ) {
            (Some(api_key), Some(base_id), Some(table)) => Some(RecordStoreConfig {
                api_key,
                base_id,
                table,
                timeout: Duration::from_secs(env_parse(
                    "RECONCILE_TIMEOUT_SECS",
                    DEFAULT_RECONCILE_TIMEOUT_SECS,
                )?),
            }),
            _ => None,
        };

        let mut field_schema = FieldSchema {
            gallery_mode: env_parse("GALLERY_FIELD_MODE", GalleryFieldMode::default())?,
            ..FieldSchema::default()
        };
        if let Some(name) = env_opt("FIELD_SUBMISSION_ID") {
            field_schema.submission_id = name;
        }
        if let Some(name) = env_opt("FIELD_NAME") {
            field_schema.display_name = name;
        }
        if let Some(name) = env_opt("FIELD_SLUG") {
            field_schema.slug = name;
        }
        if let Some(name) = env_opt("FIELD_STATUS") {
            field_schema.status = name;
        }

        Ok(PipelineConfig {
            storage,
            record_store,
            profiles: SlotProfiles::from_env()?,
            field_schema,
            download_timeout: Duration::from_secs(env_parse(
                "DOWNLOAD_TIMEOUT_SECS",
                DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            )?),
            publish_timeout: Duration::from_secs(env_parse(
                "PUBLISH_TIMEOUT_SECS",
                DEFAULT_PUBLISH_TIMEOUT_SECS,
            )?),
            max_concurrent_slots: env_parse("MAX_CONCURRENT_SLOTS", DEFAULT_MAX_CONCURRENT_SLOTS)?,
        })
    }
}
