//! Extraction orchestrator
//!
//! Owns the compiled metric registry, the sentence classifier, the identity
//! resolver and the sentence splitter. All four are immutable once built, so
//! one extractor serves every rayon worker in a batch.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::{normalize_whitespace, SentenceSplitter, Sentences, UnicodeSentenceSplitter};
use crate::error::CallsheetResult;
use crate::identity::DocumentIdentifier;
use crate::metrics::MetricRegistry;
use crate::narrative::SentenceClassifier;
use crate::record::{RawDocument, TranscriptRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Fan documents out over the rayon pool
    pub parallel: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

pub struct Extractor {
    registry: MetricRegistry,
    classifier: SentenceClassifier,
    identifier: DocumentIdentifier,
    splitter: Box<dyn SentenceSplitter>,
    options: ExtractorOptions,
}

impl Extractor {
    /// Build with the default identity rules (3 header lines, `_` delimiter)
    pub fn new(splitter: Box<dyn SentenceSplitter>) -> CallsheetResult<Self> {
        Ok(Self {
            registry: MetricRegistry::new()?,
            classifier: SentenceClassifier::new()?,
            identifier: DocumentIdentifier::new(3, "_")?,
            splitter,
            options: ExtractorOptions::default(),
        })
    }

    pub fn from_config(config: &Config) -> CallsheetResult<Self> {
        let splitter = UnicodeSentenceSplitter::new()
            .with_abbreviations(config.extra_abbreviations.iter());
        let extractor = Self::new(Box::new(splitter))?
            .with_identifier(DocumentIdentifier::new(
                config.header_lines,
                config.filename_delimiter.as_str(),
            )?)
            .with_options(ExtractorOptions {
                parallel: config.parallel,
            });
        Ok(extractor)
    }

    pub fn with_options(mut self, options: ExtractorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_identifier(mut self, identifier: DocumentIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn options(&self) -> ExtractorOptions {
        self.options
    }

    /// Identity, metrics and narrative for one transcript
    pub fn extract(&self, document: &RawDocument) -> TranscriptRecord {
        let normalized = normalize_whitespace(&document.text);
        let sentences = Sentences::new(&normalized, self.splitter.as_ref());

        let identity = self.identifier.identify(&document.text, document.source());
        let metrics = self.registry.extract(&sentences);
        let narrative = self.classifier.classify(&sentences);

        debug!(
            "📄 {}: {} sentences, {} metrics",
            document.source().display(),
            sentences.len(),
            metrics.len()
        );

        TranscriptRecord {
            identity,
            file_name: document.file_name(),
            metrics,
            narrative,
        }
    }

    /// Extract every document; output order matches input order
    pub fn extract_all(&self, documents: &[RawDocument]) -> Vec<TranscriptRecord> {
        info!(
            "🔍 Extracting {} transcript(s) ({})",
            documents.len(),
            if self.options.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );

        if self.options.parallel {
            documents.par_iter().map(|doc| self.extract(doc)).collect()
        } else {
            documents.iter().map(|doc| self.extract(doc)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(Box::new(UnicodeSentenceSplitter::new())).unwrap()
    }

    #[test]
    fn test_extract_single_document() {
        let doc = RawDocument::new(
            "acme_Q2_July_30_2024.txt",
            "Acme Corp\nSecond quarter call\n\nRevenue was $1.5 billion.\nWe expect demand to improve.",
        );
        let record = extractor().extract(&doc);

        assert_eq!(record.file_name, "acme_Q2_July_30_2024.txt");
        assert_eq!(record.identity.ticker.as_deref(), Some("ACME"));
        assert_eq!(record.metrics.get("revenue"), Some(1500.0));
        assert_eq!(
            record.narrative.get("forward_look").unwrap(),
            &["We expect demand to improve.".to_string()]
        );
        assert_eq!(record.narrative.get("demand_mentions").unwrap().len(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let documents: Vec<_> = (1..=8)
            .map(|i| {
                RawDocument::new(
                    format!("t{i}_Q1_May_{i}_2024.txt"),
                    format!("Revenue was ${i} billion. Guidance is unchanged."),
                )
            })
            .collect();

        let parallel = extractor().extract_all(&documents);
        let sequential = extractor()
            .with_options(ExtractorOptions { parallel: false })
            .extract_all(&documents);

        assert_eq!(parallel, sequential);
        let names: Vec<_> = parallel.iter().map(|r| r.file_name.clone()).collect();
        let expected: Vec<_> = documents.iter().map(|d| d.file_name()).collect();
        assert_eq!(names, expected);
        assert_eq!(parallel[2].metrics.get("revenue"), Some(3000.0));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            header_lines: 1,
            filename_delimiter: "-".to_string(),
            parallel: false,
            ..Config::default()
        };
        let extractor = Extractor::from_config(&config).unwrap();
        assert!(!extractor.options().parallel);

        let doc = RawDocument::new("msft-Q4-July-25-2023.txt", "Hello\n(NASDAQ:XYZ)");
        let record = extractor.extract(&doc);
        assert_eq!(record.identity.ticker.as_deref(), Some("MSFT"));
    }
}
