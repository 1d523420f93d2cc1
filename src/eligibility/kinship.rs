//! Kinship classification from free-text relationship cells

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::records::normalize_text;

/// Relationship of a roster member to the household titular
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kinship {
    Titular,
    /// Spouse or companion partner
    Spouse,
    /// Son or daughter, including step-children
    Child,
    /// Father or step-father
    Father,
    /// Mother or step-mother
    Mother,
    Other,
}

const TITULAR_WORDS: &[&str] = &["titular", "principal", "holder", "self", "cotizante"];
const SPOUSE_WORDS: &[&str] = &[
    "conyuge", "esposo", "esposa", "conviviente", "spouse", "wife", "husband", "partner",
];
const CHILD_WORDS: &[&str] = &[
    "hijo", "hija", "hijos", "hijas", "son", "daughter", "child", "stepson", "stepdaughter",
];
const FATHER_WORDS: &[&str] = &["padre", "papa", "father", "padrastro", "stepfather"];
const MOTHER_WORDS: &[&str] = &["madre", "mama", "mother", "madrastra", "stepmother"];

// Stems matched as word prefixes
const SPOUSE_STEMS: &[&str] = &["companer"];
const CHILD_STEMS: &[&str] = &["hijastr"];

// Relatives by marriage; any of these makes the whole cell Other
const IN_LAW_WORDS: &[&str] = &[
    "politico", "politica", "politicos", "politicas", "suegro", "suegra", "suegros", "yerno",
    "nuera", "cunado", "cunada", "inlaw",
];

impl Kinship {
    /// Classify a relationship cell.
    ///
    /// The first word that names a relationship decides, so `"Hijo del titular"`
    /// is a child. In-laws (`"Father-in-law"`, `"Hijo político"`, `"Suegra"`) and
    /// unrecognized text are [`Kinship::Other`].
    pub fn classify(text: &str) -> Self {
        let normalized = normalize_text(text);
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if is_in_law(&words) {
            return Kinship::Other;
        }
        words
            .iter()
            .find_map(|w| Self::from_word(w))
            .unwrap_or(Kinship::Other)
    }

    fn from_word(word: &str) -> Option<Self> {
        if is_one_of(word, TITULAR_WORDS) {
            Some(Kinship::Titular)
        } else if is_one_of(word, SPOUSE_WORDS) || has_stem(word, SPOUSE_STEMS) {
            Some(Kinship::Spouse)
        } else if is_one_of(word, CHILD_WORDS) || has_stem(word, CHILD_STEMS) {
            Some(Kinship::Child)
        } else if is_one_of(word, FATHER_WORDS) {
            Some(Kinship::Father)
        } else if is_one_of(word, MOTHER_WORDS) {
            Some(Kinship::Mother)
        } else {
            None
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Kinship::Father | Kinship::Mother)
    }
}

fn is_one_of(word: &str, words: &[&str]) -> bool {
    words.iter().any(|w| *w == word)
}

fn is_in_law(words: &[&str]) -> bool {
    words.iter().any(|w| is_one_of(w, IN_LAW_WORDS))
        || words
            .windows(2)
            .any(|pair| pair[0] == "in" && matches!(pair[1], "law" | "laws"))
}

fn has_stem(word: &str, stems: &[&str]) -> bool {
    stems.iter().any(|stem| word.starts_with(stem))
}

impl fmt::Display for Kinship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kinship::Titular => "Titular",
            Kinship::Spouse => "Spouse",
            Kinship::Child => "Child",
            Kinship::Father => "Father",
            Kinship::Mother => "Mother",
            Kinship::Other => "Other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_spanish() {
        assert_eq!(Kinship::classify("Cónyuge"), Kinship::Spouse);
        assert_eq!(Kinship::classify("COMPAÑERA PERMANENTE"), Kinship::Spouse);
        assert_eq!(Kinship::classify("Hija"), Kinship::Child);
        assert_eq!(Kinship::classify("Hijastro"), Kinship::Child);
        assert_eq!(Kinship::classify("Padre"), Kinship::Father);
        assert_eq!(Kinship::classify("madre"), Kinship::Mother);
        assert_eq!(Kinship::classify("Titular"), Kinship::Titular);
    }

    #[test]
    fn test_classify_english_and_unknown() {
        assert_eq!(Kinship::classify("Domestic partner"), Kinship::Spouse);
        assert_eq!(Kinship::classify("son"), Kinship::Child);
        assert_eq!(Kinship::classify("Hijo del titular"), Kinship::Child);
        assert_eq!(Kinship::classify("Hermano"), Kinship::Other);
        assert_eq!(Kinship::classify("Person"), Kinship::Other);
        assert_eq!(Kinship::classify(""), Kinship::Other);
    }

    #[test]
    fn test_in_laws_are_other() {
        for text in [
            "Father-in-law",
            "Mother-in-law",
            "Son-in-law",
            "Daughter in law",
            "Hijo político",
            "Padre Político",
            "Madre politica",
            "Suegra",
            "Yerno",
            "Nuera",
            "Cuñado",
        ] {
            assert_eq!(Kinship::classify(text), Kinship::Other, "{text}");
        }
        assert_eq!(Kinship::classify("Padre"), Kinship::Father);
    }

    #[test]
    fn test_step_relatives_follow_blood_relatives() {
        assert_eq!(Kinship::classify("Padrastro"), Kinship::Father);
        assert_eq!(Kinship::classify("Madrastra"), Kinship::Mother);
        assert_eq!(Kinship::classify("Stepfather"), Kinship::Father);
        assert_eq!(Kinship::classify("stepmother"), Kinship::Mother);
        assert_eq!(Kinship::classify("Hijastra"), Kinship::Child);
        assert_eq!(Kinship::classify("Stepson"), Kinship::Child);
        assert!(Kinship::classify("Madrastra").is_parent());
    }
}
