//! HTTP client for the Notion database query endpoint
//!
//! Every call is a `POST {base}/databases/{id}/query` with a bearer token and
//! the pinned `Notion-Version` header. Any non-2xx answer becomes
//! [`CoreError::Upstream`] with the raw status and body; timeouts surface as
//! [`CoreError::Transport`]. There is no retry.

use super::properties::Page;
use super::TableSource;
use crate::config::{NotionConfig, NOTION_API_VERSION};
use crate::error::CoreError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Request body of a database query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
}

impl QueryBody {
    /// `property` date equals `date`
    pub fn date_equals(property: &str, date: &str) -> Self {
        Self {
            filter: Some(json!({
                "property": property,
                "date": { "equals": date }
            })),
            sorts: Vec::new(),
        }
    }

    /// `property` equals `value` as rich text, or as a title
    pub fn text_equals(property: &str, value: &str) -> Self {
        Self {
            filter: Some(json!({
                "or": [
                    { "property": property, "rich_text": { "equals": value } },
                    { "property": property, "title": { "equals": value } }
                ]
            })),
            sorts: Vec::new(),
        }
    }

    /// `property` checkbox is false, newest rows first
    pub fn unchecked_newest_first(property: &str) -> Self {
        Self {
            filter: Some(json!({
                "property": property,
                "checkbox": { "equals": false }
            })),
            sorts: vec![json!({ "timestamp": "created_time", "direction": "descending" })],
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Page>,
}

/// Notion API client (cheap to clone, shares one connection pool)
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Result<Self, CoreError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| CoreError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_API_VERSION));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run one query against a database and return its result rows
    pub async fn query_database(
        &self,
        table_id: &str,
        body: &QueryBody,
    ) -> Result<Vec<Page>, CoreError> {
        let url = format!("{}/databases/{}/query", self.base_url, table_id);
        debug!(table_id, filter = ?body.filter, "Querying Notion database");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CoreError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: QueryResponse = serde_json::from_str(&text)?;
        debug!(table_id, rows = parsed.results.len(), "Notion query returned");
        Ok(parsed.results)
    }
}

impl TableSource for NotionClient {
    async fn query_by_date(
        &self,
        table_id: &str,
        property: &str,
        date: &str,
    ) -> Result<Vec<Page>, CoreError> {
        self.query_database(table_id, &QueryBody::date_equals(property, date))
            .await
    }

    async fn query_by_text(
        &self,
        table_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Vec<Page>, CoreError> {
        self.query_database(table_id, &QueryBody::text_equals(property, value))
            .await
    }

    async fn query_unresolved(
        &self,
        table_id: &str,
        resolved_property: &str,
    ) -> Result<Vec<Page>, CoreError> {
        self.query_database(
            table_id,
            &QueryBody::unchecked_newest_first(resolved_property),
        )
        .await
    }
}
