//! Build a tariff table from its raw configuration
//!
//! The configuration maps range keys such as `"0,59"` to plan→price objects.
//! Malformed brackets and prices are dropped and reported, never fatal.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::{TariffEntry, TariffTable};
use crate::numeric::parse_numeric_str;

/// Raw tariff configuration, in file order
pub type TariffConfig = Map<String, Value>;

/// Why a bracket or price was dropped at load time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DropReason {
    /// Range key does not split into exactly two parts
    MalformedKey,
    /// A bound does not parse as a number
    UnparseableBound,
    /// `min > max`
    InvertedRange,
    /// Bracket value is not a plan→price object
    NotAPriceMap,
    /// Price for a plan does not parse as a number
    UnparseablePrice { plan: String },
    /// Same plan priced twice in one bracket (first price kept)
    DuplicatePlan { plan: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MalformedKey => write!(f, "range key must be '<min>,<max>'"),
            DropReason::UnparseableBound => write!(f, "range bound is not a number"),
            DropReason::InvertedRange => write!(f, "range minimum exceeds maximum"),
            DropReason::NotAPriceMap => write!(f, "bracket is not a plan→price object"),
            DropReason::UnparseablePrice { plan } => write!(f, "price for plan '{plan}' is not a number"),
            DropReason::DuplicatePlan { plan } => write!(f, "plan '{plan}' priced more than once"),
        }
    }
}

/// A dropped configuration item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedItem {
    pub range_key: String,
    pub reason: DropReason,
}

/// Outcome of loading a tariff configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TariffLoadReport {
    pub brackets_loaded: usize,
    pub prices_loaded: usize,
    pub dropped: Vec<DroppedItem>,
}

impl TariffLoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    fn drop_item(&mut self, range_key: &str, reason: DropReason) {
        log::warn!("tariff: dropping '{range_key}': {reason}");
        self.dropped.push(DroppedItem {
            range_key: range_key.to_string(),
            reason,
        });
    }
}

/// Parse a `"<min>,<max>"` range key
pub fn parse_range_key(key: &str) -> Result<(f64, f64), DropReason> {
    let parts: Vec<&str> = key.split(',').collect();
    let [min, max] = parts.as_slice() else {
        return Err(DropReason::MalformedKey);
    };

    let min = parse_numeric_str(min).ok_or(DropReason::UnparseableBound)?;
    let max = parse_numeric_str(max).ok_or(DropReason::UnparseableBound)?;
    if min > max {
        return Err(DropReason::InvertedRange);
    }
    Ok((min, max))
}

fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|p| p.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Build a tariff table in configuration order
pub fn load_tariff(config: &TariffConfig) -> (TariffTable, TariffLoadReport) {
    let mut table = TariffTable::default();
    let mut report = TariffLoadReport::default();

    for (range_key, bracket) in config {
        let (age_min, age_max) = match parse_range_key(range_key) {
            Ok(bounds) => bounds,
            Err(reason) => {
                report.drop_item(range_key, reason);
                continue;
            }
        };

        let Value::Object(prices) = bracket else {
            report.drop_item(range_key, DropReason::NotAPriceMap);
            continue;
        };

        let mut entry = TariffEntry::new(age_min, age_max);
        for (plan, raw_price) in prices {
            let Some(price) = parse_price(raw_price) else {
                report.drop_item(range_key, DropReason::UnparseablePrice { plan: plan.clone() });
                continue;
            };
            if entry.insert_price(plan, price) {
                report.prices_loaded += 1;
            } else {
                report.drop_item(range_key, DropReason::DuplicatePlan { plan: plan.clone() });
            }
        }

        log::debug!(
            "tariff: bracket [{age_min}, {age_max}] with {} plan(s)",
            entry.plan_count()
        );
        table.push(entry);
        report.brackets_loaded += 1;
    }

    (table, report)
}
