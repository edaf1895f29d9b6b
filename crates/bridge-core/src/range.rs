//! A1-notation helpers for the ticket sheet.
//!
//! The read range fixes where data rows start; each fetched row's write-back
//! address is derived from its position in the batch.

use crate::config::ENV_SHEET_RANGE;
use crate::error::{BridgeError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Columns overwritten on a processed row: status marker, issue number, tracker status.
pub const WRITE_BACK_FIRST_COLUMN: char = 'E';
pub const WRITE_BACK_LAST_COLUMN: char = 'G';

/// Row limit of a Google Sheets spreadsheet.
pub const MAX_SHEET_ROWS: u32 = 10_000_000;

static RANGE_RE: OnceLock<Regex> = OnceLock::new();

fn range_re() -> &'static Regex {
    RANGE_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<sheet>'(?:[^']|'')+'|[^!']+)!)?(?P<c1>[A-Za-z]+)(?P<r1>[0-9]+)?(?::(?P<c2>[A-Za-z]+)(?P<r2>[0-9]+)?)?$",
        )
        .unwrap()
    })
}

// ---------------------------------------------------------------------------
// SheetRange
// ---------------------------------------------------------------------------

/// A parsed read range such as `Sheet1!A2:H`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    raw: String,
    sheet: Option<String>,
    first_row: u32,
}

impl SheetRange {
    /// Parse an A1 range. The range must start at column `A` because ticket
    /// fields are read positionally from the first column.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: String| BridgeError::InvalidConfiguration {
            key: ENV_SHEET_RANGE,
            reason,
        };

        let caps = range_re()
            .captures(raw)
            .ok_or_else(|| invalid(format!("'{raw}' is not an A1 range")))?;

        if !caps["c1"].eq_ignore_ascii_case("A") {
            return Err(invalid(format!(
                "'{raw}' must start at column A, found column {}",
                &caps["c1"]
            )));
        }

        let first_row = match caps.name("r1") {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map_err(|e| invalid(format!("'{raw}': {e}")))?,
            None => 1,
        };
        if first_row == 0 {
            return Err(invalid(format!("'{raw}': rows are numbered from 1")));
        }
        if first_row > MAX_SHEET_ROWS {
            return Err(invalid(format!(
                "'{raw}': row {first_row} is past the {MAX_SHEET_ROWS}-row sheet limit"
            )));
        }

        let sheet = caps.name("sheet").map(|m| m.as_str().to_string());

        Ok(Self {
            raw: raw.to_string(),
            sheet,
            first_row,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Spreadsheet row number of the first fetched row.
    pub fn first_row(&self) -> u32 {
        self.first_row
    }

    /// Spreadsheet row number of the row at `index` within a fetched batch.
    pub fn sheet_row(&self, index: usize) -> u32 {
        let offset = u32::try_from(index).unwrap_or(u32::MAX);
        self.first_row.saturating_add(offset)
    }

    /// Address of the three write-back cells for the batch row at `index`,
    /// on the same sheet as the read range: `Sheet1!E2:G2` for the first row
    /// of `Sheet1!A2:H`, bare `E2:G2` when the range names no sheet.
    pub fn write_back_range(&self, index: usize) -> String {
        let row = self.sheet_row(index);
        let cells = format!("{WRITE_BACK_FIRST_COLUMN}{row}:{WRITE_BACK_LAST_COLUMN}{row}");
        match &self.sheet {
            Some(sheet) => format!("{sheet}!{cells}"),
            None => cells,
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Column letter for a zero-based cell index (`0` → `A`).
pub fn column_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}
