use crate::error::{BridgeError, Result};
use crate::range::column_letter;
use serde_json::Value;

/// Playbook tag that marks a ticket as an engineering bug.
pub const ENGINEERING_BUG_PLAYBOOK: &str = "EngineeringBug";

/// Literal written into the status column once an issue has been filed.
pub const TRIGGERED_STATUS: &str = "Triggered";

// ---------------------------------------------------------------------------
// TicketRow
// ---------------------------------------------------------------------------

/// One support ticket as laid out in columns A–G of the sheet.
///
/// Columns A–D are owned by the ticket intake system. Columns E–G are written
/// by the reconciler after an issue has been filed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRow {
    pub ticket_id: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub playbook_name: Option<String>,
    pub status: Option<String>,
    pub issue_number: Option<String>,
    pub tracker_status: Option<String>,
}

impl TicketRow {
    /// Build a row from the raw cells returned by the store.
    ///
    /// The store drops trailing blank cells, so short rows are normal and the
    /// missing fields are `None`. Cells past column G are ignored.
    pub fn from_cells(sheet_row: u32, cells: &[Value]) -> Result<Self> {
        let cell = |index: usize| -> Result<Option<String>> {
            match cells.get(index) {
                None => Ok(None),
                Some(value) => cell_text(value).map_err(|reason| BridgeError::MalformedRow {
                    row: sheet_row,
                    column: column_letter(index),
                    reason,
                }),
            }
        };

        Ok(Self {
            ticket_id: cell(0)?,
            subject: cell(1)?,
            content: cell(2)?,
            playbook_name: cell(3)?,
            status: cell(4)?,
            issue_number: cell(5)?,
            tracker_status: cell(6)?,
        })
    }

    /// An engineering bug with no tracker issue recorded yet.
    pub fn qualifies(&self) -> bool {
        self.playbook_name.as_deref() == Some(ENGINEERING_BUG_PLAYBOOK)
            && self.issue_number.is_none()
    }
}

fn cell_text(value: &Value) -> std::result::Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("expected a scalar cell, found an array".to_string()),
        Value::Object(_) => Err("expected a scalar cell, found an object".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
