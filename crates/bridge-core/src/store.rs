//! The tabular store holding ticket rows, and its Google Sheets adapter.

use crate::config::SheetsConfig;
use crate::error::{BridgeError, Result, Service};
use crate::upstream;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

/// One row of cells as returned by the store, left to right.
pub type CellRow = Vec<Value>;

// ---------------------------------------------------------------------------
// TabularStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read every row in `range`, in sheet order. An empty range yields no rows.
    async fn get_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<CellRow>>;

    /// Overwrite exactly the cells addressed by `range` with `values`.
    async fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<CellRow>,
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SheetsClient
// ---------------------------------------------------------------------------

/// Google Sheets v4 `spreadsheets.values` client.
#[derive(Clone)]
pub struct SheetsClient {
    api_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsClient")
            .field("api_url", &self.api_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<CellRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_range: Option<String>,
    #[serde(default)]
    updated_cells: Option<u64>,
}

impl SheetsClient {
    pub fn new(
        api_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_url: api_url.into(),
            access_token: access_token.into(),
            client: upstream::build_client(Service::Sheets, timeout)?,
        })
    }

    pub fn from_config(config: &SheetsConfig, timeout: Duration) -> Result<Self> {
        Self::new(&config.api_url, &config.access_token, timeout)
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_url).map_err(|e| {
            BridgeError::upstream(
                Service::Sheets,
                format!("invalid API URL '{}': {e}", self.api_url),
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                BridgeError::upstream(
                    Service::Sheets,
                    format!("API URL '{}' cannot take a path", self.api_url),
                )
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn get_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<CellRow>> {
        let url = self.values_url(spreadsheet_id, range)?;
        let request = self.client.get(url).bearer_auth(&self.access_token);
        let body: ValueRange = upstream::send_json(Service::Sheets, request).await?;
        tracing::debug!(range, rows = body.values.len(), "fetched sheet range");
        Ok(body.values)
    }

    async fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<CellRow>,
    ) -> Result<()> {
        let mut url = self.values_url(spreadsheet_id, range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let request = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": values,
            }));
        let body: UpdateValuesResponse = upstream::send_json(Service::Sheets, request).await?;
        tracing::debug!(
            range,
            updated_range = body.updated_range.as_deref().unwrap_or(""),
            updated_cells = body.updated_cells.unwrap_or(0),
            "updated sheet range"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
