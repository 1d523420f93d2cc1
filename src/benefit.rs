//! Benefit valuation: configured amounts per (policy type, plan) and the final
//! applies/reason decision for each record

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::eligibility::{Kinship, Regime, Transition};

/// One configured benefit amount.
///
/// Deserializes from an object or from a `[policy_type, plan_id, amount]` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitValue {
    pub policy_type: String,
    pub plan_id: String,
    pub amount: f64,
}

impl BenefitValue {
    pub fn new(policy_type: &str, plan_id: &str, amount: f64) -> Self {
        Self {
            policy_type: policy_type.to_string(),
            plan_id: plan_id.to_string(),
            amount,
        }
    }
}

/// Static benefit reference data, read-only during a run.
///
/// Policy types match case-insensitively; plan ids match exactly after trimming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenefitValueTable {
    amounts: HashMap<(String, String), f64>,
}

fn policy_type_key(policy_type: &str) -> String {
    policy_type.trim().to_lowercase()
}

impl BenefitValueTable {
    /// Build from configured values; a repeated (policy type, plan) keeps its first amount
    pub fn from_values(values: &[BenefitValue]) -> Self {
        let mut amounts = HashMap::new();
        for value in values {
            let key = (policy_type_key(&value.policy_type), value.plan_id.trim().to_string());
            if amounts.contains_key(&key) {
                log::warn!(
                    "benefit: duplicate value for ({}, {}); keeping the first",
                    value.policy_type,
                    value.plan_id
                );
                continue;
            }
            amounts.insert(key, value.amount);
        }
        Self { amounts }
    }

    pub fn lookup(&self, policy_type: &str, plan_id: &str) -> Option<f64> {
        self.amounts
            .get(&(policy_type_key(policy_type), plan_id.trim().to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// What the valuation stage knows about one record
#[derive(Debug, Clone, Copy)]
pub struct ValuationInput<'a> {
    pub eligible: bool,
    /// `None` when eligibility was not evaluated for the run
    pub regime: Option<Regime>,
    pub transition: Option<Transition>,
    pub kinship: Kinship,
    pub policy_type: &'a str,
    pub plan_id: &'a str,
}

/// Final benefit decision for a record
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub applies: bool,
    pub amount: f64,
    pub reason: String,
}

impl BenefitValueTable {
    /// Decide whether the benefit applies and why.
    ///
    /// Rejections use the first matching reason: no configured (or zero) value, parent in
    /// a married household, spouse in a single household, otherwise kinship
    /// outside the regime's priority. Transition households get a suffix.
    pub fn assess(&self, input: &ValuationInput<'_>) -> Assessment {
        let configured = self.lookup(input.policy_type, input.plan_id);
        let regime_label = input
            .regime
            .map(|r| r.to_string())
            .unwrap_or_else(|| "Unclassified".to_string());

        let (applies, amount, mut reason) = match configured {
            Some(amount) if input.eligible && amount > 0.0 => (
                true,
                amount,
                format!(
                    "applies under group '{}' and plan '{}'",
                    regime_label,
                    input.plan_id.trim()
                ),
            ),
            None => (false, 0.0, "no configured value".to_string()),
            Some(amount) if amount <= 0.0 => (false, 0.0, "no configured value".to_string()),
            Some(_) => (false, 0.0, rejection_reason(input, &regime_label)),
        };

        if let Some(transition) = input.transition {
            reason.push_str(&format!("; transition {transition}"));
        }

        Assessment {
            applies,
            amount,
            reason,
        }
    }
}

fn rejection_reason(input: &ValuationInput<'_>, regime_label: &str) -> String {
    match input.regime {
        Some(regime) if regime.is_married() && input.kinship.is_parent() => {
            "excluded: married regime, kinship is parent".to_string()
        }
        Some(Regime::Single) if input.kinship == Kinship::Spouse => {
            "transition detected: regime says single but spouse/partner present".to_string()
        }
        _ => format!("does not qualify under regime '{regime_label}': kinship outside priority"),
    }
}
