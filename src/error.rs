//! Error types for configuration loading, table adapters and household evaluation

use thiserror::Error;

/// Errors surfaced by the loaders and table constructors.
///
/// A run itself never fails; these only come from reading configuration or
/// building a record table.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A household whose data could not be evaluated.
///
/// Raised per household by the eligibility policy; the engine records it as a
/// warning and leaves the household at default flags.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HouseholdFault {
    #[error("household '{household}': marital status is not text (row {row})")]
    MaritalStatusNotText { household: String, row: usize },

    #[error("household '{household}': kinship is not text (row {row})")]
    KinshipNotText { household: String, row: usize },

    #[error("household '{household}' has no members")]
    Empty { household: String },
}

impl HouseholdFault {
    pub fn household(&self) -> &str {
        match self {
            HouseholdFault::MaritalStatusNotText { household, .. }
            | HouseholdFault::KinshipNotText { household, .. }
            | HouseholdFault::Empty { household } => household,
        }
    }
}
