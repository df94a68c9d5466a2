//! Row/record to [`Submission`] extraction.
//!
//! Two input shapes feed the pipeline: positional rows from a spreadsheet
//! export, and named-field records pulled from the external record store.
//! Both funnel through the same validation: image references must parse as
//! http(s) URLs, invalid gallery entries are dropped silently, and a row with
//! no surviving image reference yields no submission.

use showcase_core::models::{ExternalRecord, Submission};
use tracing::{debug, warn};
use url::Url;

// Fixed column layout of the spreadsheet export. The header row is skipped.
const COL_NAME: usize = 0;
const COL_EMAIL: usize = 1;
const COL_SUBMISSION_ID: usize = 2;
const COL_HERO: usize = 3;
const COL_LOGO: usize = 4;
const COL_GALLERY: usize = 5;

/// A data row must at least reach the hero-URL column. Logo and gallery are
/// optional tail columns.
const MIN_COLUMNS: usize = 4;

/// Named source fields expected on external-store records.
#[derive(Debug, Clone)]
pub struct SourceFields {
    pub name: String,
    pub email: String,
    pub hero: String,
    pub logo: String,
    pub gallery: String,
}

impl Default for SourceFields {
    fn default() -> Self {
        SourceFields {
            name: "Name".to_string(),
            email: "Email".to_string(),
            hero: "Hero Image".to_string(),
            logo: "Logo Image".to_string(),
            gallery: "Gallery".to_string(),
        }
    }
}

/// Extract submissions from parsed tabular rows. The first row is treated as
/// the header. Malformed rows are skipped with a diagnostic, never fatal.
pub fn extract_rows(rows: &[Vec<String>]) -> Vec<Submission> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, row)| extract_row(index + 1, row))
        .collect()
}

fn extract_row(line: usize, row: &[String]) -> Option<Submission> {
    if row.len() < MIN_COLUMNS {
        warn!(line, columns = row.len(), "Skipping short row");
        return None;
    }

    let display_name = row[COL_NAME].trim();
    if display_name.is_empty() {
        warn!(line, "Skipping row with empty name");
        return None;
    }

    let hero = parse_image_url(&row[COL_HERO]);
    let logo = row.get(COL_LOGO).and_then(|raw| parse_image_url(raw));
    let gallery = row
        .get(COL_GALLERY)
        .map(|raw| split_gallery(raw))
        .unwrap_or_default();

    let submission = Submission::new(
        display_name.to_string(),
        row[COL_SUBMISSION_ID].trim().to_string(),
        row[COL_EMAIL].trim().to_string(),
        hero,
        logo,
        gallery,
    );
    if submission.is_none() {
        warn!(line, name = display_name, "Skipping row with no valid image references");
    }
    submission
}

/// Extract submissions from external-store records. The record id doubles as
/// the correlation key.
pub fn extract_records(records: &[ExternalRecord], fields: &SourceFields) -> Vec<Submission> {
    records
        .iter()
        .filter_map(|record| extract_record(record, fields))
        .collect()
}

fn extract_record(record: &ExternalRecord, fields: &SourceFields) -> Option<Submission> {
    let text_field = |name: &str| -> String {
        record
            .fields
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let display_name = text_field(&fields.name);
    if display_name.is_empty() {
        warn!(record_id = %record.id, "Skipping record with empty name");
        return None;
    }

    let hero = parse_image_url(&text_field(&fields.hero));
    let logo = parse_image_url(&text_field(&fields.logo));
    let gallery = split_gallery(&text_field(&fields.gallery));

    let submission = Submission::new(
        display_name.clone(),
        record.id.clone(),
        text_field(&fields.email),
        hero,
        logo,
        gallery,
    );
    if submission.is_none() {
        warn!(record_id = %record.id, name = %display_name, "Skipping record with no valid image references");
    }
    submission
}

/// Parse one image reference. Anything that is not a well-formed http(s) URL
/// is treated as absent.
fn parse_image_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(url) => {
            debug!(url = %url, "Dropping image reference with non-http scheme");
            None
        }
        Err(e) => {
            debug!(raw = trimmed, error = %e, "Dropping malformed image reference");
            None
        }
    }
}

/// Split a comma-joined gallery cell into validated URLs. Invalid entries are
/// dropped without failing the submission.
fn split_gallery(raw: &str) -> Vec<Url> {
    raw.split(',')
        .filter_map(parse_image_url)
        .collect()
}
