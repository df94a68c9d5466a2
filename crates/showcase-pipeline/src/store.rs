//! External record store access.
//!
//! The record store is queried by exact-match filter over a named field and
//! updated with partial-field patches; [`AirtableStore`] implements this over
//! the Airtable REST API. Credentials are explicit constructor arguments.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use showcase_core::{ExternalRecord, ReconcileError, RecordStoreConfig};

const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Query/update seam over the external record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Exact-match search on one named field; returns the first hit.
    async fn search_first(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<ExternalRecord>, ReconcileError>;

    /// Partial-field patch by record id. Fields not present in the map are
    /// left untouched. Returns the number of fields written.
    async fn update(
        &self,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<usize, ReconcileError>;

    /// List all records in the table (store-driven pipeline runs).
    async fn list(&self) -> Result<Vec<ExternalRecord>, ReconcileError>;
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<ExternalRecord>,
    offset: Option<String>,
}

/// Airtable-backed record store.
pub struct AirtableStore {
    client: reqwest::Client,
    api_key: String,
    table_url: String,
}

impl AirtableStore {
    pub fn new(config: &RecordStoreConfig) -> Result<Self, ReconcileError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReconcileError::Search(format!("HTTP client: {}", e)))?;

        let table_url = format!(
            "{}/{}/{}",
            AIRTABLE_API_URL,
            config.base_id,
            utf8_percent_encode(&config.table, NON_ALPHANUMERIC)
        );

        Ok(AirtableStore {
            client,
            api_key: config.api_key.clone(),
            table_url,
        })
    }

    /// Build an exact-match filter formula for one field.
    fn match_formula(field: &str, value: &str) -> String {
        format!("{{{}}} = \"{}\"", field, value.replace('"', "\\\""))
    }

    async fn get_page(
        &self,
        query: &[(&str, &str)],
    ) -> Result<RecordPage, ReconcileError> {
        let response = self
            .client
            .get(&self.table_url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| ReconcileError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReconcileError::Search(format!(
                "Record store returned {}",
                response.status()
            )));
        }

        response
            .json::<RecordPage>()
            .await
            .map_err(|e| ReconcileError::Search(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn search_first(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<ExternalRecord>, ReconcileError> {
        let formula = Self::match_formula(field, value);
        tracing::debug!(field, formula = %formula, "Searching record store");

        let page = self
            .get_page(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .await?;
        Ok(page.records.into_iter().next())
    }

    async fn update(
        &self,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<usize, ReconcileError> {
        let count = fields.len();
        let url = format!("{}/{}", self.table_url, record_id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| ReconcileError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReconcileError::Search(format!(
                "Record update returned {}",
                response.status()
            )));
        }

        tracing::debug!(record_id, fields = count, "Patched record");
        Ok(count)
    }

    async fn list(&self) -> Result<Vec<ExternalRecord>, ReconcileError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(ref cursor) = offset {
                query.push(("offset", cursor.as_str()));
            }

            let page = self.get_page(&query).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_quotes_field_and_value() {
        assert_eq!(
            AirtableStore::match_formula("Name", "Rust Belt Makers"),
            "{Name} = \"Rust Belt Makers\""
        );
    }

    #[test]
    fn formula_escapes_embedded_quotes() {
        assert_eq!(
            AirtableStore::match_formula("Name", "The \"Best\" Town"),
            "{Name} = \"The \\\"Best\\\" Town\""
        );
    }
}
