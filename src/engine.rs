//! Engine facade: exclusion filters, household eligibility, tariff pricing and
//! benefit valuation over a whole roster

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::benefit::{BenefitValueTable, ValuationInput};
use crate::config::{EngineConfig, ExclusionLists};
use crate::eligibility::{EligibilityPolicy, Kinship};
use crate::error::HouseholdFault;
use crate::household::group_by_household;
use crate::numeric::parse_numeric;
use crate::records::{normalize_text, Field, Record, RecordTable, Schema};
use crate::tariff::{load_tariff, FrozenSurcharge, PlanCatalog, TariffLoadReport, TariffTable};

/// Non-fatal conditions met during a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// Required household columns are absent; eligibility was skipped
    MissingColumns(Vec<Field>),
    /// A household could not be evaluated and kept default flags
    HouseholdFault(HouseholdFault),
    /// A record has no household key and was not evaluated
    UngroupedRecord { row: usize },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::MissingColumns(fields) => {
                let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
                write!(f, "eligibility skipped, missing column(s): {}", names.join(", "))
            }
            RunWarning::HouseholdFault(fault) => write!(f, "{fault}"),
            RunWarning::UngroupedRecord { row } => write!(f, "row {row} has no household key"),
        }
    }
}

/// Aggregate figures for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub input_rows: usize,
    pub excluded_rows: usize,
    pub households: usize,
    pub eligible: usize,
    pub applied: usize,
    pub transition_records: usize,
    pub invalid_plans: usize,
    pub total_premium: f64,
    pub total_benefit: f64,
}

/// Result of a run: the augmented roster plus what went wrong along the way
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: RecordTable,
    pub warnings: Vec<RunWarning>,
    pub summary: RunSummary,
}

/// Immutable rules engine; one instance can serve many runs, concurrently if needed
#[derive(Debug, Clone)]
pub struct Engine {
    tariff: TariffTable,
    benefits: BenefitValueTable,
    policy: EligibilityPolicy,
    exclusions: ExclusionLists,
    plans: PlanCatalog,
    surcharge: FrozenSurcharge,
    tariff_report: TariffLoadReport,
}

impl Engine {
    /// Assemble an engine from prebuilt tables and default rules
    pub fn new(tariff: TariffTable, benefits: BenefitValueTable) -> Self {
        Self {
            tariff,
            benefits,
            policy: EligibilityPolicy::default(),
            exclusions: ExclusionLists::default(),
            plans: PlanCatalog::default(),
            surcharge: FrozenSurcharge::default(),
            tariff_report: TariffLoadReport::default(),
        }
    }

    /// Build every table from a configuration; malformed tariff entries are dropped and reported
    pub fn from_config(config: &EngineConfig) -> Self {
        let (mut tariff, tariff_report) = load_tariff(&config.tariff);
        if config.sort_brackets {
            tariff.sort_by_age();
        }
        if !tariff_report.is_clean() {
            log::warn!(
                "tariff: {} configuration item(s) dropped at load",
                tariff_report.dropped.len()
            );
        }

        Self {
            tariff,
            benefits: BenefitValueTable::from_values(&config.benefit_values),
            policy: EligibilityPolicy::new(config.marriage_markers.clone(), config.max_beneficiaries),
            exclusions: config.exclusions.clone(),
            plans: PlanCatalog::new(&config.plans),
            surcharge: config.surcharge(),
            tariff_report,
        }
    }

    pub fn with_policy(mut self, policy: EligibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionLists) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn tariff(&self) -> &TariffTable {
        &self.tariff
    }

    pub fn tariff_report(&self) -> &TariffLoadReport {
        &self.tariff_report
    }

    /// Process one roster.
    ///
    /// Stages run strictly in order: exclusions, eligibility, premium, benefit.
    /// Never fails; problems are returned as warnings.
    pub fn run(&self, mut table: RecordTable) -> RunOutcome {
        let schema = Schema::resolve(&table.columns);
        let mut warnings = Vec::new();
        let mut summary = RunSummary {
            input_rows: table.len(),
            ..Default::default()
        };

        summary.excluded_rows = self.apply_exclusions(&mut table, &schema);
        summary.households = self.apply_eligibility(&mut table, &schema, &mut warnings);
        self.apply_premiums(&mut table, &schema);
        self.apply_benefits(&mut table, &schema);

        for record in &table.records {
            let outcome = &record.outcome;
            summary.eligible += usize::from(outcome.eligible);
            summary.applied += usize::from(outcome.applies);
            summary.transition_records += usize::from(outcome.has_transition());
            summary.invalid_plans += usize::from(!outcome.plan_valid);
            summary.total_premium += outcome.premium;
            summary.total_benefit += outcome.benefit_amount;
        }

        log::info!(
            "run: {} row(s), {} excluded, {} household(s), {} eligible, {} applied, {} warning(s)",
            summary.input_rows,
            summary.excluded_rows,
            summary.households,
            summary.eligible,
            summary.applied,
            warnings.len()
        );

        RunOutcome {
            table,
            warnings,
            summary,
        }
    }

    /// Process independent rosters in parallel; output order matches input order
    pub fn run_batch(&self, tables: Vec<RecordTable>) -> Vec<RunOutcome> {
        tables.into_par_iter().map(|table| self.run(table)).collect()
    }

    /// Drop records whose kinship, record type or status is excluded; returns the count dropped
    fn apply_exclusions(&self, table: &mut RecordTable, schema: &Schema) -> usize {
        let filters: Vec<(usize, Vec<String>)> = [
            (Field::Kinship, &self.exclusions.exclude_kinships),
            (Field::RecordType, &self.exclusions.exclude_record_types),
            (Field::Status, &self.exclusions.exclude_statuses),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .filter_map(|(field, values)| {
            let column = schema.get(field)?;
            let normalized = values.iter().map(|v| normalize_text(v)).collect();
            Some((column, normalized))
        })
        .collect();

        if filters.is_empty() {
            return 0;
        }

        let before = table.len();
        table.records.retain(|record| {
            !filters.iter().any(|(column, excluded)| {
                record
                    .cell(Some(*column))
                    .key_text()
                    .map(|value| excluded.contains(&normalize_text(&value)))
                    .unwrap_or(false)
            })
        });
        before - table.len()
    }

    /// Select beneficiaries per household; returns the number of households evaluated
    fn apply_eligibility(
        &self,
        table: &mut RecordTable,
        schema: &Schema,
        warnings: &mut Vec<RunWarning>,
    ) -> usize {
        let missing = schema.missing_household_fields();
        let Some(key_column) = schema.get(Field::HouseholdKey).filter(|_| missing.is_empty()) else {
            log::warn!(
                "eligibility: skipped, missing column(s) {:?}",
                missing
            );
            warnings.push(RunWarning::MissingColumns(missing));
            return 0;
        };

        let grouping = group_by_household(&table.records, key_column);
        for &idx in &grouping.ungrouped {
            let row = table.records[idx].row;
            log::warn!("eligibility: row {row} has no household key");
            warnings.push(RunWarning::UngroupedRecord { row });
        }

        for household in &grouping.households {
            match self.policy.evaluate_household(household, &table.records, schema) {
                Ok(verdict) => {
                    log::debug!(
                        "eligibility: household '{}' regime {} selected {}/{}",
                        household.key,
                        verdict.regime,
                        verdict.eligible_count(),
                        verdict.members.len()
                    );
                    for member in &verdict.members {
                        let outcome = &mut table.records[member.index].outcome;
                        outcome.eligible = member.eligible;
                        outcome.regime = Some(verdict.regime);
                        outcome.transition = verdict.transition;
                    }
                }
                Err(fault) => {
                    log::warn!("eligibility: {fault}");
                    for &idx in &household.members {
                        let outcome = &mut table.records[idx].outcome;
                        outcome.eligible = false;
                        outcome.set_reason(format!("household not evaluated: {fault}"));
                    }
                    warnings.push(RunWarning::HouseholdFault(fault));
                }
            }
        }

        grouping.households.len()
    }

    /// Tariff premium per record; no match prices at zero
    fn apply_premiums(&self, table: &mut RecordTable, schema: &Schema) {
        let age_column = schema.get(Field::Age);
        let plan_column = schema.get(Field::Plan);

        for record in &mut table.records {
            let age = parse_numeric(record.cell(age_column));
            let plan = plan_text(record, plan_column);
            let base = self.tariff.lookup(age, &plan);

            record.outcome.premium = self.surcharge.apply(base);
            record.outcome.plan_valid = self.plans.is_valid(&plan);
        }
    }

    /// Benefit amount and reason per record
    fn apply_benefits(&self, table: &mut RecordTable, schema: &Schema) {
        let plan_column = schema.get(Field::Plan);
        let policy_type_column = schema.get(Field::PolicyType);
        let kinship_column = schema.get(Field::Kinship);

        for record in &mut table.records {
            let plan = plan_text(record, plan_column);
            let policy_type = record.cell(policy_type_column).key_text().unwrap_or_default();
            let kinship = record
                .cell(kinship_column)
                .text()
                .map(Kinship::classify)
                .unwrap_or(Kinship::Other);

            let assessment = self.benefits.assess(&ValuationInput {
                eligible: record.outcome.eligible,
                regime: record.outcome.regime,
                transition: record.outcome.transition,
                kinship,
                policy_type: &policy_type,
                plan_id: &plan,
            });

            let outcome = &mut record.outcome;
            outcome.applies = assessment.applies;
            outcome.benefit_amount = assessment.amount;
            outcome.set_reason(assessment.reason);
        }
    }
}

fn plan_text(record: &Record, plan_column: Option<usize>) -> String {
    record.cell(plan_column).key_text().unwrap_or_default()
}
