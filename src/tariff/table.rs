//! Age-bracket tariff table with per-plan prices

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalize a plan identifier for case-insensitive matching
pub fn plan_key(plan_id: &str) -> String {
    plan_id.trim().to_lowercase()
}

/// One age bracket with its plan prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffEntry {
    /// Inclusive lower age bound
    pub age_min: f64,

    /// Inclusive upper age bound
    pub age_max: f64,

    /// Prices keyed by normalized plan identifier
    prices: HashMap<String, f64>,
}

impl TariffEntry {
    /// Create an empty bracket; `age_min` must not exceed `age_max`
    pub fn new(age_min: f64, age_max: f64) -> Self {
        Self {
            age_min,
            age_max,
            prices: HashMap::new(),
        }
    }

    /// Builder-style price insertion
    pub fn with_price(mut self, plan_id: &str, price: f64) -> Self {
        self.insert_price(plan_id, price);
        self
    }

    /// Set a plan price; returns false when the plan already had one (the first price is kept)
    pub fn insert_price(&mut self, plan_id: &str, price: f64) -> bool {
        let key = plan_key(plan_id);
        if self.prices.contains_key(&key) {
            return false;
        }
        self.prices.insert(key, price);
        true
    }

    pub fn contains_age(&self, age: f64) -> bool {
        self.age_min <= age && age <= self.age_max
    }

    pub fn price(&self, plan_id: &str) -> Option<f64> {
        self.prices.get(&plan_key(plan_id)).copied()
    }

    pub fn plan_count(&self) -> usize {
        self.prices.len()
    }
}

/// Ordered tariff brackets.
///
/// Brackets may overlap; lookups return the first match in table order, never
/// the narrowest bracket. Callers control precedence through configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    entries: Vec<TariffEntry>,
}

impl TariffTable {
    pub fn new(entries: Vec<TariffEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: TariffEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TariffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder brackets ascending by `(age_min, age_max)`; stable for ties
    pub fn sort_by_age(&mut self) {
        self.entries.sort_by(|a, b| {
            a.age_min
                .total_cmp(&b.age_min)
                .then(a.age_max.total_cmp(&b.age_max))
        });
    }

    /// Price for an age and plan.
    ///
    /// `None` when the age is unknown, the plan is blank, or no bracket
    /// containing the age prices the plan.
    pub fn lookup(&self, age: Option<f64>, plan_id: &str) -> Option<f64> {
        let age = age?;
        if plan_id.trim().is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|entry| entry.contains_age(age))
            .find_map(|entry| entry.price(plan_id))
    }
}
