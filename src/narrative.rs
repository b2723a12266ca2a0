//! Narrative sentence classification
//!
//! Sorts the sentences of a transcript into fixed narrative categories
//! (guidance, forward-looking statements, comparisons, ...). Categories are
//! independent, so one sentence can appear under several of them.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::Sentences;
use crate::error::CallsheetResult;

/// A narrative category: substring keywords and/or regex patterns
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    /// Lowercase substrings
    pub keywords: &'static [&'static str],
    /// Case-insensitive patterns
    pub patterns: &'static [&'static str],
}

/// Output order of the narrative buckets
pub static CATEGORIES: &[Category] = &[
    Category {
        name: "guidance",
        keywords: &["guidance"],
        patterns: &[],
    },
    Category {
        name: "forward_look",
        keywords: &[
            "we expect",
            "we anticipate",
            "looking ahead",
            "we forecast",
            "we believe",
            "we see",
            "we project",
        ],
        patterns: &[],
    },
    Category {
        name: "prior_year_mentions",
        keywords: &["prior year", "last year", "last year's"],
        patterns: &[],
    },
    Category {
        name: "year_over_year_mentions",
        keywords: &[],
        patterns: &[r"year[-\s]?over[-\s]?year"],
    },
    Category {
        name: "compared_to_mentions",
        keywords: &["compared to"],
        patterns: &[],
    },
    Category {
        name: "raising_mentions",
        keywords: &[],
        patterns: &[r"\brais(?:e|ed|ing)\b"],
    },
    Category {
        name: "refinance_mentions",
        keywords: &[],
        patterns: &[r"\brefinanc(?:e|ed)\b"],
    },
    Category {
        name: "production",
        keywords: &["production"],
        patterns: &[],
    },
    Category {
        name: "outlook",
        keywords: &["outlook", "expectation", "expectations", "forecast"],
        patterns: &[],
    },
    Category {
        name: "demand_mentions",
        keywords: &["demand"],
        patterns: &[],
    },
    Category {
        name: "challenge_mentions",
        keywords: &[],
        patterns: &[r"\bchalleng(?:e|ed|ing|es)\b"],
    },
];

struct CompiledCategory {
    name: &'static str,
    keywords: &'static [&'static str],
    patterns: Vec<Regex>,
}

impl CompiledCategory {
    fn matches(&self, sentence: &str, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k))
            || self.patterns.iter().any(|p| p.is_match(sentence))
    }
}

/// Sentences per category, in category order. Every category is present,
/// empty or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    buckets: Vec<(&'static str, Vec<String>)>,
}

impl Narrative {
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, sentences)| sentences.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        self.buckets
            .iter()
            .map(|(name, sentences)| (*name, sentences.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for Narrative {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, sentences) in &self.buckets {
            map.serialize_entry(name, sentences)?;
        }
        map.end()
    }
}

/// Keyword and pattern based sentence classifier
pub struct SentenceClassifier {
    categories: Vec<CompiledCategory>,
}

impl SentenceClassifier {
    pub fn new() -> CallsheetResult<Self> {
        Self::with_categories(CATEGORIES)
    }

    pub fn with_categories(categories: &'static [Category]) -> CallsheetResult<Self> {
        let categories = categories
            .iter()
            .map(|category| {
                let patterns = category
                    .patterns
                    .iter()
                    .map(|p| Regex::new(&format!("(?i){p}")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledCategory {
                    name: category.name,
                    keywords: category.keywords,
                    patterns,
                })
            })
            .collect::<CallsheetResult<Vec<_>>>()?;

        Ok(Self { categories })
    }

    pub fn classify(&self, sentences: &Sentences) -> Narrative {
        let lowered: Vec<(&str, String)> = sentences
            .iter()
            .map(|sentence| (sentence, sentence.to_lowercase()))
            .collect();

        let buckets = self
            .categories
            .iter()
            .map(|category| {
                let matched = lowered
                    .iter()
                    .filter(|(sentence, lower)| category.matches(sentence, lower))
                    .map(|(sentence, _)| sentence.to_string())
                    .collect();
                (category.name, matched)
            })
            .collect();

        Narrative { buckets }
    }
}
