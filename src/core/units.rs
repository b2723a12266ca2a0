//! Numeric and scale-unit normalization
//!
//! Amounts are reported in millions. A literal such as `$14,400,000,000` or
//! `14.4 billion` both come out as `14400.0`.

/// Scale words recognized after an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleUnit {
    Billion,
    Million,
    Thousand,
}

/// Alternation used inside matcher patterns. Longer spellings come first so
/// that `bn` is not read as `b`.
pub const UNIT_ALTERNATION: &str = "billion|million|thousand|k|bn|mn|mm|m|b";

/// Bare numbers at or above this are absolute counts, not millions.
const RAW_COUNT_THRESHOLD: f64 = 1_000_000.0;

impl ScaleUnit {
    /// Parse a unit token from the closed set. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "billion" | "bn" | "b" => Some(ScaleUnit::Billion),
            "million" | "mn" | "mm" | "m" => Some(ScaleUnit::Million),
            "thousand" | "k" => Some(ScaleUnit::Thousand),
            _ => None,
        }
    }

    /// Convert a value in this unit to millions
    pub fn to_millions(self, value: f64) -> f64 {
        match self {
            ScaleUnit::Billion => value * 1000.0,
            ScaleUnit::Million => value,
            ScaleUnit::Thousand => value / 1000.0,
        }
    }
}

/// Round to three decimal places
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Parse a cleaned literal. A single trailing period is sentence
/// punctuation, not part of the number.
fn parse_literal(cleaned: &str) -> Option<f64> {
    let trimmed = cleaned.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a literal with thousands separators removed
pub fn parse_plain(literal: &str) -> Option<f64> {
    let cleaned: String = literal.chars().filter(|c| *c != ',').collect();
    parse_literal(&cleaned)
}

/// Normalize a captured amount and optional unit token to millions.
///
/// Returns `None` when the literal does not parse; callers treat that as a
/// non-match and move on.
pub fn normalize_amount(literal: &str, unit: Option<&str>) -> Option<f64> {
    let cleaned: String = literal.chars().filter(|c| *c != ',' && *c != '$').collect();
    let value = parse_literal(&cleaned)?;

    let millions = match unit.and_then(ScaleUnit::parse) {
        Some(scale) => scale.to_millions(value),
        None if value >= RAW_COUNT_THRESHOLD => value / RAW_COUNT_THRESHOLD,
        None => value,
    };
    Some(round3(millions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_words() {
        assert_eq!(normalize_amount("2.5", Some("billion")), Some(2500.0));
        assert_eq!(normalize_amount("2.5", Some("BN")), Some(2500.0));
        assert_eq!(normalize_amount("750", Some("million")), Some(750.0));
        assert_eq!(normalize_amount("750", Some("mm")), Some(750.0));
        assert_eq!(normalize_amount("500", Some("thousand")), Some(0.5));
        assert_eq!(normalize_amount("500", Some("k")), Some(0.5));
    }

    #[test]
    fn test_raw_counts() {
        assert_eq!(normalize_amount("1500000", None), Some(1.5));
        assert_eq!(normalize_amount("$14,400,000,000", None), Some(14400.0));
        assert_eq!(normalize_amount("999,999", None), Some(999999.0));
        assert_eq!(normalize_amount("42.5", None), Some(42.5));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(normalize_amount("1234567", None), Some(1.235));
        assert_eq!(normalize_amount("1", Some("thousand")), Some(0.001));
    }

    #[test]
    fn test_malformed_literal() {
        assert_eq!(normalize_amount(",", None), None);
        assert_eq!(normalize_amount("1.2.3", Some("million")), None);
        assert_eq!(normalize_amount("", None), None);
        assert_eq!(normalize_amount(".", Some("billion")), None);
    }

    #[test]
    fn test_unknown_unit_treated_as_unset() {
        assert_eq!(ScaleUnit::parse("percent"), None);
        assert_eq!(normalize_amount("2000000", Some("shares")), Some(2.0));
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_plain("6.4"), Some(6.4));
        assert_eq!(parse_plain("1,250.5"), Some(1250.5));
        assert_eq!(parse_plain("-0.25"), Some(-0.25));
        assert_eq!(parse_plain("-"), None);
        assert_eq!(parse_plain("0.25."), Some(0.25));
        assert_eq!(parse_plain("0.25.."), None);
    }
}
