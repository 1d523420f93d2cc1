//! Household marital regime and the kinship rules attached to each regime

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Kinship;
use crate::records::normalize_text;

/// Marital regime of a household, read from its marital-status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    Single,
    Married,
    /// Married by status text while parents are still listed as dependents
    Transitioning,
}

impl Regime {
    /// Married and Transitioning households share the married rules
    pub fn is_married(&self) -> bool {
        matches!(self, Regime::Married | Regime::Transitioning)
    }

    pub fn rules(&self) -> &'static RegimeRules {
        if self.is_married() {
            &MARRIED_RULES
        } else {
            &SINGLE_RULES
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Single => "Single",
            Regime::Married => "Married",
            Regime::Transitioning => "Transitioning",
        };
        f.write_str(name)
    }
}

/// Marital-status change inferred from household composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    SingleToMarried,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::SingleToMarried => f.write_str("Single→Married"),
        }
    }
}

/// Kinship rules for one regime
#[derive(Debug)]
pub struct RegimeRules {
    /// Kinships that may be selected as beneficiaries
    pub valid: &'static [Kinship],
    /// Selection order; kinships not listed rank last
    pub priority: &'static [Kinship],
    /// Kinships forced ineligible whatever their ranking
    pub excluded: &'static [Kinship],
}

impl RegimeRules {
    pub fn is_valid(&self, kinship: Kinship) -> bool {
        self.valid.contains(&kinship)
    }

    pub fn is_excluded(&self, kinship: Kinship) -> bool {
        self.excluded.contains(&kinship)
    }

    pub fn priority_of(&self, kinship: Kinship) -> usize {
        self.priority
            .iter()
            .position(|k| *k == kinship)
            .unwrap_or(self.priority.len())
    }
}

static MARRIED_RULES: RegimeRules = RegimeRules {
    valid: &[Kinship::Spouse, Kinship::Child],
    priority: &[Kinship::Spouse, Kinship::Child],
    excluded: &[Kinship::Father, Kinship::Mother],
};

static SINGLE_RULES: RegimeRules = RegimeRules {
    valid: &[Kinship::Father, Kinship::Mother, Kinship::Child],
    priority: &[Kinship::Father, Kinship::Mother, Kinship::Child],
    excluded: &[],
};

/// Default marriage/cohabitation markers, already normalized
pub const DEFAULT_MARRIAGE_MARKERS: [&str; 8] = [
    "casad",
    "married",
    "union libre",
    "union marital",
    "companer",
    "conviviente",
    "cohabit",
    "partner",
];

/// True when `text` contains `marker` starting at a word boundary.
///
/// Both sides are expected to be normalized already.
pub fn contains_marker(text: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    text.match_indices(marker).any(|(idx, _)| {
        text[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

/// Classify a household from its marital-status text and member kinships
pub fn classify_regime<S: AsRef<str>>(
    marital_status: &str,
    kinships: &[Kinship],
    marriage_markers: &[S],
) -> (Regime, Option<Transition>) {
    let text = normalize_text(marital_status);
    let married = marriage_markers
        .iter()
        .any(|m| contains_marker(&text, &normalize_text(m.as_ref())));

    if !married {
        return (Regime::Single, None);
    }

    if kinships.iter().any(Kinship::is_parent) {
        (Regime::Transitioning, Some(Transition::SingleToMarried))
    } else {
        (Regime::Married, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_word_boundary() {
        assert!(contains_marker("casado", "casad"));
        assert!(contains_marker("soltero / union libre", "union libre"));
        assert!(contains_marker("married", "married"));
        assert!(!contains_marker("unmarried", "married"));
        assert!(!contains_marker("soltero", "casad"));
    }

    #[test]
    fn test_classify_regime() {
        let markers = DEFAULT_MARRIAGE_MARKERS;

        let (regime, transition) = classify_regime("Casado", &[Kinship::Titular, Kinship::Spouse], &markers);
        assert_eq!(regime, Regime::Married);
        assert_eq!(transition, None);

        let (regime, transition) = classify_regime("SOLTERO", &[Kinship::Titular, Kinship::Mother], &markers);
        assert_eq!(regime, Regime::Single);
        assert_eq!(transition, None);

        let (regime, transition) = classify_regime("Unión Libre", &[Kinship::Titular, Kinship::Father], &markers);
        assert_eq!(regime, Regime::Transitioning);
        assert_eq!(transition, Some(Transition::SingleToMarried));
        assert!(regime.is_married());

        let (regime, _) = classify_regime("", &[Kinship::Child], &markers);
        assert_eq!(regime, Regime::Single);
    }

    #[test]
    fn test_rules_priority() {
        let married = Regime::Married.rules();
        assert_eq!(married.priority_of(Kinship::Spouse), 0);
        assert_eq!(married.priority_of(Kinship::Child), 1);
        assert_eq!(married.priority_of(Kinship::Other), 2);
        assert!(married.is_excluded(Kinship::Mother));
        assert!(!married.is_valid(Kinship::Father));

        let single = Regime::Single.rules();
        assert!(single.is_valid(Kinship::Father));
        assert!(!single.is_valid(Kinship::Spouse));
        assert!(single.excluded.is_empty());
        assert!(std::ptr::eq(Regime::Transitioning.rules(), married));
    }

    #[test]
    fn test_transition_label() {
        assert_eq!(Transition::SingleToMarried.to_string(), "Single→Married");
    }
}
