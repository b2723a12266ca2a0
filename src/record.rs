//! Input documents and output records

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use std::path::{Path, PathBuf};

use crate::identity::DocumentIdentity;
use crate::metrics::MetricRecord;
use crate::narrative::Narrative;

/// A transcript as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub source: PathBuf,
    pub text: String,
}

impl RawDocument {
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Final path component, or the whole id when there is none
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.to_string_lossy().into_owned())
    }
}

/// Everything extracted from one transcript.
///
/// Serializes as `{ticker, quarter, year, earnings_date, file_name, metrics}`
/// where `metrics` holds the found metric values followed by every
/// narrative category.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub identity: DocumentIdentity,
    pub file_name: String,
    pub metrics: MetricRecord,
    pub narrative: Narrative,
}

struct MetricsSection<'a> {
    metrics: &'a MetricRecord,
    narrative: &'a Narrative,
}

impl Serialize for MetricsSection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len() + self.narrative.len()))?;
        for (name, value) in self.metrics.iter() {
            map.serialize_entry(name, &value)?;
        }
        for (name, sentences) in self.narrative.iter() {
            map.serialize_entry(name, sentences)?;
        }
        map.end()
    }
}

impl Serialize for TranscriptRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("TranscriptRecord", 6)?;
        record.serialize_field("ticker", &self.identity.ticker)?;
        record.serialize_field("quarter", &self.identity.quarter)?;
        record.serialize_field("year", &self.identity.year)?;
        record.serialize_field("earnings_date", &self.identity.earnings_date)?;
        record.serialize_field("file_name", &self.file_name)?;
        record.serialize_field(
            "metrics",
            &MetricsSection {
                metrics: &self.metrics,
                narrative: &self.narrative,
            },
        )?;
        record.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let doc = RawDocument::new("/data/transcripts/aapl_Q3.txt", "");
        assert_eq!(doc.file_name(), "aapl_Q3.txt");
        assert_eq!(RawDocument::new("", "").file_name(), "");
    }

    #[test]
    fn test_empty_record_shape() {
        let record = TranscriptRecord {
            identity: DocumentIdentity::default(),
            file_name: "x.txt".to_string(),
            metrics: MetricRecord::new(),
            narrative: Narrative::default(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"ticker":null,"quarter":null,"year":null,"earnings_date":null,"file_name":"x.txt","metrics":{}}"#
        );
    }
}
