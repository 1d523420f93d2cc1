//! Tariff brackets, premium pricing rules and plan catalog

mod table;
pub mod loader;

pub use table::{plan_key, TariffEntry, TariffTable};
pub use loader::{load_tariff, parse_range_key, DropReason, DroppedItem, TariffConfig, TariffLoadReport};

use std::collections::HashSet;

/// Surcharge applied on top of the bracket price for frozen-tariff groups
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrozenSurcharge {
    pub enabled: bool,
    /// Fractional rate, e.g. 0.05 for +5%
    pub rate: f64,
}

impl FrozenSurcharge {
    /// Final premium from a bracket price; a missing price counts as zero
    pub fn apply(&self, base: Option<f64>) -> f64 {
        let base = base.unwrap_or(0.0);
        if self.enabled {
            base * (1.0 + self.rate)
        } else {
            base
        }
    }
}

/// Optional whitelist of sellable plans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: HashSet<String>,
}

impl PlanCatalog {
    pub fn new<S: AsRef<str>>(plans: &[S]) -> Self {
        Self {
            plans: plans
                .iter()
                .map(|p| plan_key(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Without a whitelist every plan is valid
    pub fn is_valid(&self, plan_id: &str) -> bool {
        self.plans.is_empty() || self.plans.contains(&plan_key(plan_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frozen_surcharge() {
        let off = FrozenSurcharge::default();
        assert_eq!(off.apply(Some(100.0)), 100.0);
        assert_eq!(off.apply(None), 0.0);

        let on = FrozenSurcharge { enabled: true, rate: 0.05 };
        assert_relative_eq!(on.apply(Some(100.0)), 105.0);
        assert_eq!(on.apply(None), 0.0);
    }

    #[test]
    fn test_plan_catalog() {
        let open = PlanCatalog::default();
        assert!(open.is_valid("anything"));

        let catalog = PlanCatalog::new(&["P1", " p2 "]);
        assert!(catalog.is_valid("p1"));
        assert!(catalog.is_valid("P2"));
        assert!(!catalog.is_valid("P3"));
        assert!(!catalog.is_valid(""));
    }
}
