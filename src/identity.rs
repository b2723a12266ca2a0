//! Document identity
//!
//! Ticker, fiscal quarter, year and call date, read from the transcript
//! header and, failing that, from the file name
//! (`AAPL_Q3_October_24_2024.txt`).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::text_normalizer::first_lines;
use crate::error::{CallsheetError, CallsheetResult};

const TICKER_PATTERN: &str = r"\(([A-Z]+):([A-Z]+)\)";
const QUARTER_PATTERN: &str = r"\b(Q[1-4])\s+(\d{4})\b";
const DATE_PATTERN: &str = r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FromStr for Quarter {
    type Err = CallsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            other => Err(CallsheetError::Other(anyhow::anyhow!(
                "Not a fiscal quarter: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

/// Call date: a calendar date when it parses, the raw text otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EarningsDate {
    Calendar(NaiveDate),
    Text(String),
}

impl EarningsDate {
    fn parse(text: &str, format: &str) -> Self {
        match NaiveDate::parse_from_str(text, format) {
            Ok(date) => EarningsDate::Calendar(date),
            Err(_) => EarningsDate::Text(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentIdentity {
    pub ticker: Option<String>,
    pub quarter: Option<Quarter>,
    pub year: Option<i32>,
    pub earnings_date: Option<EarningsDate>,
}

impl DocumentIdentity {
    pub fn is_complete(&self) -> bool {
        self.ticker.is_some()
            && self.quarter.is_some()
            && self.year.is_some()
            && self.earnings_date.is_some()
    }
}

/// Resolves [`DocumentIdentity`] from header lines and file names
#[derive(Debug, Clone)]
pub struct DocumentIdentifier {
    header_lines: usize,
    delimiter: String,
    ticker_re: Regex,
    quarter_re: Regex,
    date_re: Regex,
}

impl DocumentIdentifier {
    pub fn new(header_lines: usize, delimiter: impl Into<String>) -> CallsheetResult<Self> {
        Ok(Self {
            header_lines,
            delimiter: delimiter.into(),
            ticker_re: Regex::new(TICKER_PATTERN)?,
            quarter_re: Regex::new(QUARTER_PATTERN)?,
            date_re: Regex::new(DATE_PATTERN)?,
        })
    }

    /// The header when it names all four fields, otherwise the file name
    /// alone
    pub fn identify(&self, raw_text: &str, source: &Path) -> DocumentIdentity {
        let header = self.read_header(raw_text);
        if header.is_complete() {
            return header;
        }

        warn!(
            "⚠️ Header identity incomplete for {}, using file name",
            source.display()
        );
        self.read_file_name(source)
    }

    pub fn read_header(&self, raw_text: &str) -> DocumentIdentity {
        let header = first_lines(raw_text, self.header_lines);

        let ticker = self
            .ticker_re
            .captures(&header)
            .map(|caps| caps[2].to_string());

        let (quarter, year) = match self.quarter_re.captures(&header) {
            Some(caps) => (caps[1].parse().ok(), caps[2].parse().ok()),
            None => (None, None),
        };

        let earnings_date = self
            .date_re
            .find(&header)
            .map(|m| EarningsDate::parse(m.as_str(), "%B %d, %Y"));

        DocumentIdentity {
            ticker,
            quarter,
            year,
            earnings_date,
        }
    }

    pub fn read_file_name(&self, source: &Path) -> DocumentIdentity {
        let Some(stem) = source.file_stem().map(|s| s.to_string_lossy()) else {
            return DocumentIdentity::default();
        };
        let parts: Vec<&str> = stem.split(self.delimiter.as_str()).collect();

        let ticker = parts
            .first()
            .filter(|p| !p.is_empty())
            .map(|p| p.to_uppercase());
        let quarter = parts.get(1).and_then(|p| p.parse().ok());

        let mut identity = DocumentIdentity {
            ticker,
            quarter,
            ..Default::default()
        };

        if parts.len() >= 4 {
            let last = parts[parts.len() - 1];
            let digits: String = last.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.len() >= 4 {
                identity.year = digits[..4].parse().ok();
                let date_text = format!("{} {}", parts[2..parts.len() - 1].join(" "), last);
                identity.earnings_date = Some(EarningsDate::parse(&date_text, "%B %d %Y"));
            }
        }

        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier() -> DocumentIdentifier {
        DocumentIdentifier::new(3, "_").unwrap()
    }

    #[test]
    fn test_header_identity() {
        let raw = "Apple Inc. (NASDAQ:AAPL)\nQ3 2024 Earnings Call\nOctober 24, 2024\nOperator: Good afternoon.";
        let identity = identifier().identify(raw, Path::new("whatever.txt"));

        assert_eq!(identity.ticker.as_deref(), Some("AAPL"));
        assert_eq!(identity.quarter, Some(Quarter::Q3));
        assert_eq!(identity.year, Some(2024));
        assert_eq!(
            identity.earnings_date,
            Some(EarningsDate::Calendar(
                NaiveDate::from_ymd_opt(2024, 10, 24).unwrap()
            ))
        );
    }

    #[test]
    fn test_header_only_reads_first_lines() {
        let raw = "Welcome\nto the call\nthanks\nAcme (NYSE:ACME) Q1 2023 March 3, 2023";
        let identity = identifier().read_header(raw);
        assert_eq!(identity, DocumentIdentity::default());
    }

    #[test]
    fn test_file_name_fallback() {
        let identity = identifier().identify(
            "Operator: Welcome to the call.",
            Path::new("/data/aapl_Q3_October_24_2024.txt"),
        );

        assert_eq!(identity.ticker.as_deref(), Some("AAPL"));
        assert_eq!(identity.quarter, Some(Quarter::Q3));
        assert_eq!(identity.year, Some(2024));
        assert_eq!(
            identity.earnings_date,
            Some(EarningsDate::Calendar(
                NaiveDate::from_ymd_opt(2024, 10, 24).unwrap()
            ))
        );
    }

    #[test]
    fn test_short_file_name() {
        let identity = identifier().read_file_name(Path::new("msft_annual.txt"));
        assert_eq!(identity.ticker.as_deref(), Some("MSFT"));
        assert_eq!(identity.quarter, None);
        assert_eq!(identity.year, None);
        assert_eq!(identity.earnings_date, None);
    }

    #[test]
    fn test_unparsed_date_kept_as_text() {
        let identity = identifier().read_file_name(Path::new("xyz_Q2_late_summer_2021.txt"));
        assert_eq!(identity.year, Some(2021));
        assert_eq!(
            identity.earnings_date,
            Some(EarningsDate::Text("late summer 2021".to_string()))
        );
    }

    #[test]
    fn test_partial_header_is_discarded() {
        let raw = "Acme Corp (NYSE:ACME)\nQ1 2023 Earnings Call";
        let identity = identifier().identify(raw, Path::new("zzz_Q4_May_1_2020.txt"));
        assert_eq!(identity.ticker.as_deref(), Some("ZZZ"));
        assert_eq!(identity.quarter, Some(Quarter::Q4));
        assert_eq!(identity.year, Some(2020));
        assert_eq!(
            identity.earnings_date,
            Some(EarningsDate::Calendar(
                NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
            ))
        );
    }

    #[test]
    fn test_partial_header_with_short_file_name() {
        let raw = "Acme Corp (NYSE:ACME)\nQ1 2023 Earnings Call";
        let identity = identifier().identify(raw, Path::new("acme.txt"));
        assert_eq!(identity.ticker.as_deref(), Some("ACME"));
        assert_eq!(identity.quarter, None);
        assert_eq!(identity.year, None);
        assert_eq!(identity.earnings_date, None);
    }

    #[test]
    fn test_date_serializes_as_iso() {
        let date = EarningsDate::Calendar(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), r#""2024-01-05""#);
        assert_eq!(
            serde_json::to_string(&Quarter::Q2).unwrap(),
            r#""Q2""#
        );
    }
}
