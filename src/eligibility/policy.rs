//! Per-household beneficiary selection
//!
//! For each household the regime is read from the first member's marital-status
//! cell, valid-kinship members are ranked by the regime's priority list and the
//! first `max_beneficiaries` become eligible. Kinships the regime excludes are
//! forced ineligible afterwards.

use super::regime::{classify_regime, DEFAULT_MARRIAGE_MARKERS};
use super::{Kinship, Regime, Transition};
use crate::error::HouseholdFault;
use crate::household::Household;
use crate::records::{CellValue, Field, Record, Schema};

/// Default cap on beneficiaries per household
pub const DEFAULT_MAX_BENEFICIARIES: usize = 3;

/// Selection outcome for one member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberVerdict {
    /// Index into the record slice the household was grouped from
    pub index: usize,
    pub kinship: Kinship,
    pub eligible: bool,
}

/// Selection outcome for one household
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdVerdict {
    pub regime: Regime,
    pub transition: Option<Transition>,
    /// Members in original row order
    pub members: Vec<MemberVerdict>,
}

impl HouseholdVerdict {
    pub fn eligible_count(&self) -> usize {
        self.members.iter().filter(|m| m.eligible).count()
    }
}

/// Household eligibility rules
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    marriage_markers: Vec<String>,
    max_beneficiaries: usize,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            marriage_markers: DEFAULT_MARRIAGE_MARKERS.iter().map(|m| m.to_string()).collect(),
            max_beneficiaries: DEFAULT_MAX_BENEFICIARIES,
        }
    }
}

impl EligibilityPolicy {
    pub fn new(marriage_markers: Vec<String>, max_beneficiaries: usize) -> Self {
        Self {
            marriage_markers,
            max_beneficiaries,
        }
    }

    pub fn max_beneficiaries(&self) -> usize {
        self.max_beneficiaries
    }

    /// Evaluate one household.
    ///
    /// Fails when the household's cells cannot be read as text; the caller keeps
    /// that household at default flags.
    pub fn evaluate_household(
        &self,
        household: &Household,
        records: &[Record],
        schema: &Schema,
    ) -> Result<HouseholdVerdict, HouseholdFault> {
        let first = household
            .members
            .first()
            .and_then(|&idx| records.get(idx))
            .ok_or_else(|| HouseholdFault::Empty {
                household: household.key.clone(),
            })?;

        let marital_status = match first.cell(schema.get(Field::MaritalStatus)) {
            CellValue::Number(_) => {
                return Err(HouseholdFault::MaritalStatusNotText {
                    household: household.key.clone(),
                    row: first.row,
                })
            }
            cell => cell.text().unwrap_or(""),
        };

        let kinships = household
            .members
            .iter()
            .map(|&idx| {
                let record = &records[idx];
                match record.cell(schema.get(Field::Kinship)) {
                    CellValue::Number(_) => Err(HouseholdFault::KinshipNotText {
                        household: household.key.clone(),
                        row: record.row,
                    }),
                    cell => Ok(Kinship::classify(cell.text().unwrap_or(""))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (regime, transition) = classify_regime(marital_status, &kinships, &self.marriage_markers);
        let eligible = self.select(regime, &kinships);

        let members = household
            .members
            .iter()
            .zip(kinships.iter().zip(eligible))
            .map(|(&index, (&kinship, eligible))| MemberVerdict {
                index,
                kinship,
                eligible,
            })
            .collect();

        Ok(HouseholdVerdict {
            regime,
            transition,
            members,
        })
    }

    /// Rank-and-cap selection over member kinships, in member order
    pub fn select(&self, regime: Regime, kinships: &[Kinship]) -> Vec<bool> {
        let rules = regime.rules();

        let mut candidates: Vec<(usize, usize)> = kinships
            .iter()
            .enumerate()
            .filter(|(_, k)| rules.is_valid(**k))
            .map(|(pos, k)| (rules.priority_of(*k), pos))
            .collect();
        // Stable, so equal priorities keep row order
        candidates.sort_by_key(|(priority, _)| *priority);

        let mut eligible = vec![false; kinships.len()];
        for (_, pos) in candidates.into_iter().take(self.max_beneficiaries) {
            eligible[pos] = true;
        }

        for (pos, kinship) in kinships.iter().enumerate() {
            if rules.is_excluded(*kinship) {
                eligible[pos] = false;
            }
        }

        eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordTable;

    fn household_table(rows: &[(&str, &str, &str)]) -> (RecordTable, Household) {
        let columns = ["Titular", "Parentesco", "Estado Civil"];
        let rows: Vec<Vec<&str>> = rows.iter().map(|(k, p, e)| vec![*k, *p, *e]).collect();
        let table = RecordTable::from_rows(&columns, &rows).unwrap();
        let household = Household {
            key: "100".to_string(),
            members: (0..table.len()).collect(),
        };
        (table, household)
    }

    #[test]
    fn test_married_household_caps_and_excludes_parent() {
        let (table, household) = household_table(&[
            ("100", "Esposa", "Casado"),
            ("100", "Hijo", "Casado"),
            ("100", "Hija", "Casado"),
            ("100", "Hijo", "Casado"),
            ("100", "Padre", "Casado"),
        ]);
        let schema = Schema::resolve(&table.columns);
        let verdict = EligibilityPolicy::default()
            .evaluate_household(&household, &table.records, &schema)
            .unwrap();

        let flags: Vec<bool> = verdict.members.iter().map(|m| m.eligible).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
        assert_eq!(verdict.eligible_count(), 3);
        assert_eq!(verdict.regime, Regime::Transitioning);
        assert_eq!(verdict.transition, Some(Transition::SingleToMarried));
    }

    #[test]
    fn test_single_household_prefers_parents() {
        let (table, household) = household_table(&[
            ("100", "Titular", "Soltero"),
            ("100", "Hijo", ""),
            ("100", "Madre", ""),
            ("100", "Hija", ""),
            ("100", "Padre", ""),
        ]);
        let schema = Schema::resolve(&table.columns);
        let verdict = EligibilityPolicy::default()
            .evaluate_household(&household, &table.records, &schema)
            .unwrap();

        // Father, Mother, then the first child by row order
        let flags: Vec<bool> = verdict.members.iter().map(|m| m.eligible).collect();
        assert_eq!(flags, vec![false, true, true, false, true]);
        assert_eq!(verdict.regime, Regime::Single);
        assert_eq!(verdict.transition, None);
    }

    #[test]
    fn test_single_household_spouse_is_not_selected() {
        let policy = EligibilityPolicy::default();
        let flags = policy.select(Regime::Single, &[Kinship::Titular, Kinship::Spouse, Kinship::Child]);
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn test_custom_cap() {
        let policy = EligibilityPolicy::new(vec!["casad".into()], 1);
        let flags = policy.select(Regime::Married, &[Kinship::Child, Kinship::Spouse]);
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_numeric_kinship_is_a_household_fault() {
        let mut table = RecordTable::new(vec!["Titular".into(), "Parentesco".into(), "Estado Civil".into()]);
        table
            .push_row(vec![
                CellValue::Text("100".into()),
                CellValue::Number(3.0),
                CellValue::Text("Casado".into()),
            ])
            .unwrap();
        let household = Household {
            key: "100".to_string(),
            members: vec![0],
        };
        let schema = Schema::resolve(&table.columns);

        let fault = EligibilityPolicy::default()
            .evaluate_household(&household, &table.records, &schema)
            .unwrap_err();
        assert_eq!(
            fault,
            HouseholdFault::KinshipNotText {
                household: "100".into(),
                row: 0
            }
        );
        assert_eq!(fault.household(), "100");
    }
}
