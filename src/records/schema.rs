//! Column resolution for free-form roster headers
//!
//! Headers are matched once per run against alias lists after case folding,
//! accent folding and separator normalization, so `"Estado_Civil"`,
//! `"ESTADO CIVIL"` and `"estado civil"` all resolve to the marital-status column.

use std::collections::HashMap;
use std::fmt;

/// Semantic fields the engine reads from a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    HouseholdKey,
    Kinship,
    MaritalStatus,
    Age,
    Plan,
    PolicyType,
    RecordType,
    Status,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::HouseholdKey,
        Field::Kinship,
        Field::MaritalStatus,
        Field::Age,
        Field::Plan,
        Field::PolicyType,
        Field::RecordType,
        Field::Status,
    ];

    /// Fields the eligibility stage cannot run without
    pub const HOUSEHOLD_REQUIRED: [Field; 3] =
        [Field::HouseholdKey, Field::MaritalStatus, Field::Kinship];

    /// Accepted header spellings, already normalized
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::HouseholdKey => &[
                "titular",
                "id titular",
                "identificacion titular",
                "cedula titular",
                "documento titular",
                "identificacion asegurado principal",
                "asegurado principal",
                "household",
                "household key",
                "household id",
                "holder id",
            ],
            Field::Kinship => &["parentesco", "kinship", "relationship", "relacion"],
            Field::MaritalStatus => &["estado civil", "marital status", "civil status"],
            Field::Age => &["edad", "age"],
            Field::Plan => &["plan", "plan id", "codigo plan"],
            Field::PolicyType => &["tipo poliza", "tipo de poliza", "policy type", "ramo"],
            Field::RecordType => &["tipo", "type", "tipo registro", "record type"],
            Field::Status => &["estado", "status"],
        }
    }

    fn slot(&self) -> usize {
        match self {
            Field::HouseholdKey => 0,
            Field::Kinship => 1,
            Field::MaritalStatus => 2,
            Field::Age => 3,
            Field::Plan => 4,
            Field::PolicyType => 5,
            Field::RecordType => 6,
            Field::Status => 7,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::HouseholdKey => "household key",
            Field::Kinship => "kinship",
            Field::MaritalStatus => "marital status",
            Field::Age => "age",
            Field::Plan => "plan",
            Field::PolicyType => "policy type",
            Field::RecordType => "record type",
            Field::Status => "status",
        };
        f.write_str(name)
    }
}

/// Resolved column positions for one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    positions: [Option<usize>; 8],
}

impl Schema {
    /// Resolve every field against the table headers; the first matching header wins
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut by_label: HashMap<String, usize> = HashMap::new();
        for (idx, column) in columns.iter().enumerate() {
            by_label.entry(normalize_label(column.as_ref())).or_insert(idx);
        }

        let mut schema = Schema::default();
        for field in Field::ALL {
            schema.positions[field.slot()] = field
                .aliases()
                .iter()
                .find_map(|alias| by_label.get(*alias).copied());
        }
        schema
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.positions[field.slot()]
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Required household fields absent from the table
    pub fn missing_household_fields(&self) -> Vec<Field> {
        Field::HOUSEHOLD_REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.has(*f))
            .collect()
    }
}

/// Lowercase, strip accents, and collapse `_`, `-`, `.` and whitespace runs to one space
pub fn normalize_label(label: &str) -> String {
    let folded = normalize_text(label);
    folded
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-' || c == '.')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and strip accents, keeping everything else
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

/// Map accented Latin letters to their base letter
pub fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}
