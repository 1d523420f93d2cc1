//! Tariff Engine - Premium and family-benefit rules for group insurance rosters
//!
//! This library provides:
//! - Locale-tolerant numeric parsing of roster cells
//! - Age-bracket tariff lookup with first-match precedence
//! - Stable household grouping by titular
//! - Household eligibility (marital regime, kinship priority, beneficiary cap)
//! - Benefit valuation with human-readable reasons
//! - A facade that runs the whole pipeline over one or many rosters

pub mod error;
pub mod numeric;
pub mod records;
pub mod tariff;
pub mod household;
pub mod eligibility;
pub mod benefit;
pub mod config;
pub mod engine;

// Re-export commonly used types
pub use error::{EngineError, EngineResult, HouseholdFault};
pub use numeric::{parse_numeric, parse_numeric_str};
pub use records::{CellValue, Record, RecordOutcome, RecordTable, Schema};
pub use tariff::{TariffEntry, TariffTable, TariffLoadReport};
pub use household::{group_by_household, Household};
pub use eligibility::{EligibilityPolicy, Kinship, Regime, Transition};
pub use benefit::{BenefitValue, BenefitValueTable};
pub use config::EngineConfig;
pub use engine::{Engine, RunOutcome, RunSummary, RunWarning};
