//! Tolerant numeric parsing for roster cells and tariff configuration
//!
//! Spreadsheets exported from different locales mix `,` and `.` as decimal and
//! thousands separators. Candidates are tried in a fixed precedence order and the
//! first one that parses wins.

use crate::records::CellValue;

/// Parse a cell into a number.
///
/// Numeric cells are returned as-is, text cells go through [`parse_numeric_str`],
/// empty cells yield `None`.
pub fn parse_numeric(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Empty => None,
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(s) => parse_numeric_str(s),
    }
}

/// Parse a free-form string into a number, or `None` if no reading works.
///
/// Precedence:
/// 1. the literal (whitespace removed)
/// 2. both `,` and `.` present: the rightmost one is the decimal mark
/// 3. only `,` present: `,` is the decimal mark
/// 4. more than one `.`: every `.` is a thousands separator
pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if let Some(n) = parse_finite(&compact) {
        return Some(n);
    }

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            let candidate = if comma > dot {
                compact.replace('.', "").replace(',', ".")
            } else {
                compact.replace(',', "")
            };
            parse_finite(&candidate)
        }
        (Some(_), None) => parse_finite(&compact.replace(',', ".")),
        (None, Some(_)) if compact.matches('.').count() > 1 => {
            parse_finite(&compact.replace('.', ""))
        }
        _ => None,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_locale_forms() {
        for raw in ["1.234,56", "1,234.56", "1234.56", " 1 234,56 "] {
            let parsed = parse_numeric_str(raw).expect(raw);
            assert_relative_eq!(parsed, 1234.56, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_comma_decimal_and_dotted_thousands() {
        assert_relative_eq!(parse_numeric_str("12,5").unwrap(), 12.5);
        assert_relative_eq!(parse_numeric_str("1.234.567").unwrap(), 1_234_567.0);
        assert_relative_eq!(parse_numeric_str("1.234.567,89").unwrap(), 1_234_567.89, epsilon = 1e-6);
        // A single dot stays a decimal mark
        assert_relative_eq!(parse_numeric_str("1.234").unwrap(), 1.234);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_numeric(&CellValue::Empty), None);
        assert_eq!(parse_numeric_str(""), None);
        assert_eq!(parse_numeric_str("   "), None);
        assert_eq!(parse_numeric_str("abc"), None);
        assert_eq!(parse_numeric_str("1,2,3"), None);
        assert_eq!(parse_numeric_str("NaN"), None);
        assert_eq!(parse_numeric_str("inf"), None);
    }

    #[test]
    fn test_numeric_cell_passthrough() {
        assert_eq!(parse_numeric(&CellValue::Number(42.0)), Some(42.0));
        assert_eq!(parse_numeric(&CellValue::Text("42".into())), Some(42.0));
        assert_eq!(parse_numeric(&CellValue::Number(f64::NAN)), None);
    }
}
