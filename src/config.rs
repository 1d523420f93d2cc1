//! Engine configuration
//!
//! Loaded from JSON. Keys written by the original roster tool
//! (`Parentescos_Excluir`, `Planes`, `cobroFM`, `T_Congelada`, ...) are accepted
//! as aliases so existing `config.json` files keep working.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::benefit::BenefitValue;
use crate::eligibility::{DEFAULT_MARRIAGE_MARKERS, DEFAULT_MAX_BENEFICIARIES};
use crate::error::EngineResult;
use crate::records::normalize_text;
use crate::tariff::{FrozenSurcharge, TariffConfig};

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_max_beneficiaries() -> usize {
    DEFAULT_MAX_BENEFICIARIES
}

fn default_marriage_markers() -> Vec<String> {
    DEFAULT_MARRIAGE_MARKERS.iter().map(|m| m.to_string()).collect()
}

/// Values filtered out of the roster before any rule runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExclusionLists {
    /// Kinship cell values to drop
    #[serde(default, alias = "Parentescos_Excluir")]
    pub exclude_kinships: Vec<String>,

    /// Record type cell values to drop
    #[serde(default, alias = "Tipos_Excluir")]
    pub exclude_record_types: Vec<String>,

    /// Status cell values to drop
    #[serde(default, alias = "Estados_Excluir")]
    pub exclude_statuses: Vec<String>,
}

impl ExclusionLists {
    pub fn is_empty(&self) -> bool {
        self.exclude_kinships.is_empty()
            && self.exclude_record_types.is_empty()
            && self.exclude_statuses.is_empty()
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Range key (`"<min>,<max>"`) → plan → price, in precedence order
    #[serde(default, alias = "Tarifas")]
    pub tariff: TariffConfig,

    /// Sort brackets by age before lookups instead of using file order
    #[serde(default)]
    pub sort_brackets: bool,

    /// Benefit amounts per (policy type, plan)
    #[serde(default)]
    pub benefit_values: Vec<BenefitValue>,

    #[serde(flatten)]
    pub exclusions: ExclusionLists,

    /// Plan whitelist; empty means every plan is valid
    #[serde(default, alias = "Planes")]
    pub plans: Vec<String>,

    /// Apply the frozen-tariff surcharge
    #[serde(default, alias = "cobroFM", deserialize_with = "deserialize_flag")]
    pub frozen_surcharge: bool,

    /// Frozen-tariff surcharge rate
    #[serde(default, alias = "T_Congelada")]
    pub frozen_rate: f64,

    /// Maximum beneficiaries selected per household
    #[serde(default = "default_max_beneficiaries")]
    pub max_beneficiaries: usize,

    /// Marital-status markers that read as married or cohabiting
    #[serde(default = "default_marriage_markers")]
    pub marriage_markers: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tariff: TariffConfig::new(),
            sort_brackets: false,
            benefit_values: Vec::new(),
            exclusions: ExclusionLists::default(),
            plans: Vec::new(),
            frozen_surcharge: false,
            frozen_rate: 0.0,
            max_beneficiaries: DEFAULT_MAX_BENEFICIARIES,
            marriage_markers: default_marriage_markers(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load configuration from any reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> EngineResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load configuration from the default location
    pub fn load_default() -> EngineResult<Self> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn surcharge(&self) -> FrozenSurcharge {
        FrozenSurcharge {
            enabled: self.frozen_surcharge,
            rate: self.frozen_rate,
        }
    }
}

/// Accept `true`/`false` as well as the original tool's `"Si"`/`"No"` strings
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => matches!(normalize_text(&s).as_str(), "si" | "yes" | "true" | "y" | "s" | "1"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_beneficiaries, 3);
        assert!(config.marriage_markers.iter().any(|m| m == "casad"));
        assert!(!config.surcharge().enabled);
    }

    #[test]
    fn test_legacy_keys() {
        let raw = r#"{
            "Parentescos_Excluir": ["Hermano"],
            "Tipos_Excluir": ["Retiro"],
            "Estados_Excluir": ["Inactivo"],
            "Planes": ["P1", "P2"],
            "cobroFM": "Sí",
            "T_Congelada": 0.05
        }"#;
        let config: EngineConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.exclusions.exclude_kinships, vec!["Hermano"]);
        assert_eq!(config.exclusions.exclude_record_types, vec!["Retiro"]);
        assert_eq!(config.exclusions.exclude_statuses, vec!["Inactivo"]);
        assert_eq!(config.plans, vec!["P1", "P2"]);
        assert!(config.frozen_surcharge);
        assert_eq!(config.frozen_rate, 0.05);
    }

    #[test]
    fn test_tariff_order_is_preserved() {
        let raw = r#"{"tariff": {"18,99": {"P1": 100}, "0,17": {"P1": 50}}}"#;
        let config = EngineConfig::from_reader(raw.as_bytes()).unwrap();
        let keys: Vec<&str> = config.tariff.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["18,99", "0,17"]);
    }

    #[test]
    fn test_flag_forms() {
        let config: EngineConfig = serde_json::from_str(r#"{"frozen_surcharge": true}"#).unwrap();
        assert!(config.frozen_surcharge);
        let config: EngineConfig = serde_json::from_str(r#"{"cobroFM": "No"}"#).unwrap();
        assert!(!config.frozen_surcharge);
    }
}
