//! One reconciliation pass over the ticket sheet.
//!
//! A pass fetches the configured range, files a tracker issue for every
//! engineering-bug row without an issue number, and writes the issue back to
//! the row. Rows are handled strictly in sheet order and the first failure
//! ends the pass; rows written before it stay written.
//!
//! Every fetched row is parsed before the first issue is filed, so a row with
//! a non-scalar cell fails the whole pass with nothing filed, even for the
//! qualifying rows above it.
//!
//! The only guard against filing twice is the issue-number cell read at the
//! start of the pass. Two overlapping passes, or a write-back that fails after
//! the issue was created, will file duplicate issues.

use crate::config::{BridgeConfig, RepoCoordinates};
use crate::error::Result;
use crate::range::SheetRange;
use crate::row::{TicketRow, TRIGGERED_STATUS};
use crate::store::{SheetsClient, TabularStore};
use crate::tracker::{self, IssueTracker};
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub const NO_DATA_MESSAGE: &str = "No data found.";
pub const PROCESSED_MESSAGE: &str = "Tickets processed.";

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// An issue filed for one sheet row during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledIssue {
    pub sheet_row: u32,
    pub ticket_id: Option<String>,
    pub number: u64,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub pass_id: Uuid,
    pub rows_scanned: usize,
    pub filed: Vec<FiledIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The range held no rows; nothing was evaluated.
    NoData,
    Processed(BatchReport),
}

impl BatchOutcome {
    /// Caller-facing summary line.
    pub fn message(&self) -> &'static str {
        match self {
            BatchOutcome::NoData => NO_DATA_MESSAGE,
            BatchOutcome::Processed(_) => PROCESSED_MESSAGE,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

pub struct Reconciler {
    store: Arc<dyn TabularStore>,
    tracker: Arc<dyn IssueTracker>,
    spreadsheet_id: String,
    range: SheetRange,
    repo: RepoCoordinates,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn TabularStore>,
        tracker: Arc<dyn IssueTracker>,
        spreadsheet_id: impl Into<String>,
        range: SheetRange,
        repo: RepoCoordinates,
    ) -> Self {
        Self {
            store,
            tracker,
            spreadsheet_id: spreadsheet_id.into(),
            range,
            repo,
        }
    }

    /// Wire the Sheets and tracker HTTP adapters from a validated config.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let store = Arc::new(SheetsClient::from_config(
            &config.sheets,
            config.http_timeout,
        )?);
        let tracker = tracker::from_config(&config.tracker, config.http_timeout)?;
        Ok(Self::new(
            store,
            tracker,
            config.sheets.spreadsheet_id.clone(),
            config.sheets.range.clone(),
            config.tracker.repo.clone(),
        ))
    }

    /// Run one full pass over the sheet.
    pub async fn process_batch(&self) -> Result<BatchOutcome> {
        let pass_id = Uuid::new_v4();
        let span = tracing::info_span!("reconcile", %pass_id, range = %self.range);
        self.run_pass(pass_id).instrument(span).await
    }

    async fn run_pass(&self, pass_id: Uuid) -> Result<BatchOutcome> {
        let cells = self
            .store
            .get_range(&self.spreadsheet_id, self.range.as_str())
            .await?;

        if cells.is_empty() {
            tracing::info!("no rows in range");
            return Ok(BatchOutcome::NoData);
        }

        let rows = cells
            .iter()
            .enumerate()
            .map(|(index, row)| TicketRow::from_cells(self.range.sheet_row(index), row))
            .collect::<Result<Vec<_>>>()?;

        let mut filed = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            if !row.qualifies() {
                continue;
            }
            filed.push(self.file_issue(index, row).await?);
        }

        tracing::info!(
            rows_scanned = rows.len(),
            issues_filed = filed.len(),
            "pass complete"
        );

        Ok(BatchOutcome::Processed(BatchReport {
            pass_id,
            rows_scanned: rows.len(),
            filed,
        }))
    }

    async fn file_issue(&self, index: usize, row: &TicketRow) -> Result<FiledIssue> {
        let sheet_row = self.range.sheet_row(index);
        let title = row.subject.as_deref().unwrap_or_default();
        let body = row.content.as_deref().unwrap_or_default();

        let issue = self
            .tracker
            .create_issue(&self.repo, title, body)
            .await
            .inspect_err(|e| tracing::error!(sheet_row, error = %e, "issue creation failed"))?;
        let status = issue.sheet_status();

        let target = self.range.write_back_range(index);
        self.store
            .update_range(
                &self.spreadsheet_id,
                &target,
                vec![vec![json!(TRIGGERED_STATUS), json!(issue.number), json!(status)]],
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    sheet_row,
                    issue = issue.number,
                    error = %e,
                    "write-back failed after the issue was created"
                )
            })?;

        tracing::info!(
            sheet_row,
            ticket_id = row.ticket_id.as_deref().unwrap_or(""),
            issue = issue.number,
            status,
            "filed tracker issue"
        );

        Ok(FiledIssue {
            sheet_row,
            ticket_id: row.ticket_id.clone(),
            number: issue.number,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
