//! Record table structures: one row per insured person

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::eligibility::{Regime, Transition};
use crate::error::{EngineError, EngineResult};

/// Column names appended to the table by a run, in output order
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "premium",
    "plan_valid",
    "eligible",
    "applies",
    "benefit_amount",
    "reason",
    "transition",
];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single cell of the input roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a cell from raw spreadsheet text; blank text becomes `Empty`
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Trimmed text content, `None` for empty or numeric cells
    pub fn text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Text rendering used for keys and identifiers.
    ///
    /// Integral numbers render without a fractional part so that a household
    /// id read as `1020.0` groups with the text `"1020"`.
    pub fn key_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Fields computed for a record during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Tariff premium (zero when no bracket matched)
    pub premium: f64,

    /// Whether the plan is in the configured catalog (always true without a catalog)
    pub plan_valid: bool,

    /// Selected as a household beneficiary
    pub eligible: bool,

    /// Benefit granted (eligible and a positive configured amount)
    pub applies: bool,

    /// Granted benefit amount (zero when not applicable)
    pub benefit_amount: f64,

    /// Human-readable explanation, written once per run
    pub reason: String,

    /// Household regime, `None` when eligibility was not evaluated
    pub regime: Option<Regime>,

    /// Marital-status transition detected on the household
    pub transition: Option<Transition>,
}

impl RecordOutcome {
    /// Write the reason unless one was already set; returns whether it was written
    pub fn set_reason(&mut self, reason: impl Into<String>) -> bool {
        if !self.reason.is_empty() {
            return false;
        }
        self.reason = reason.into();
        true
    }

    pub fn has_transition(&self) -> bool {
        self.transition.is_some()
    }
}

/// One roster row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Position in the input table, kept through exclusion filtering
    pub row: usize,

    /// Cells aligned with the table columns
    pub cells: Vec<CellValue>,

    /// Fields added by the engine
    pub outcome: RecordOutcome,
}

impl Record {
    /// Cell at a resolved column; missing columns read as empty
    pub fn cell(&self, column: Option<usize>) -> &CellValue {
        column
            .and_then(|idx| self.cells.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Ordered roster with free-form column names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> EngineResult<()> {
        let row = self.records.len();
        if cells.len() != self.columns.len() {
            return Err(EngineError::RowWidth {
                row,
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        self.records.push(Record {
            row,
            cells,
            outcome: RecordOutcome::default(),
        });
        Ok(())
    }

    /// Build a table from text rows, mostly for callers holding in-memory data
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> EngineResult<Self> {
        let mut table = Self::new(columns.iter().map(|c| c.as_ref().to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| CellValue::from_raw(v.as_ref())).collect())?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_text() {
        assert_eq!(CellValue::Number(1020.0).key_text().as_deref(), Some("1020"));
        assert_eq!(CellValue::Text("  1020 ".into()).key_text().as_deref(), Some("1020"));
        assert_eq!(CellValue::Text("   ".into()).key_text(), None);
        assert_eq!(CellValue::Empty.key_text(), None);
    }

    #[test]
    fn test_push_row_width() {
        let mut table = RecordTable::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(vec![CellValue::Empty, CellValue::Empty]).is_ok());
        let err = table.push_row(vec![CellValue::Empty]).unwrap_err();
        assert!(matches!(err, EngineError::RowWidth { row: 1, expected: 2, actual: 1 }));
    }

    #[test]
    fn test_reason_is_written_once() {
        let mut outcome = RecordOutcome::default();
        assert!(outcome.set_reason("first"));
        assert!(!outcome.set_reason("second"));
        assert_eq!(outcome.reason, "first");
    }
}
