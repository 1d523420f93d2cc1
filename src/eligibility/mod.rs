//! Household eligibility: regime classification, kinship rules and beneficiary selection

mod kinship;
mod regime;
mod policy;

pub use kinship::Kinship;
pub use regime::{classify_regime, contains_marker, Regime, RegimeRules, Transition, DEFAULT_MARRIAGE_MARKERS};
pub use policy::{EligibilityPolicy, HouseholdVerdict, MemberVerdict, DEFAULT_MAX_BENEFICIARIES};
