//! Sentence segmentation
//!
//! The splitter is an ordinary value built once by the caller and handed to
//! the [`Extractor`](crate::extractor::Extractor). Segmentation follows the
//! Unicode sentence boundary rules, then re-joins boundaries that were only
//! produced by a title or company abbreviation ("Mr.", "Inc.").

use std::collections::HashSet;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Abbreviations that end with a period but do not end a sentence
const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "inc", "corp", "co", "ltd", "llc", "jr", "sr", "st", "vs",
    "approx", "dept", "est",
];

/// Capitalized words that open a sentence rather than continue a name
const SENTENCE_OPENERS: &[&str] = &[
    "a", "after", "an", "and", "as", "at", "but", "for", "he", "i", "if", "in", "it", "let",
    "next", "now", "on", "our", "she", "so", "thank", "thanks", "that", "the", "there", "these",
    "they", "this", "we", "what", "when", "with", "you",
];

/// Splits normalized text into sentence byte ranges.
///
/// Implementations must be deterministic and hold no per-document state;
/// one instance is shared by every worker in a batch.
pub trait SentenceSplitter: Send + Sync {
    /// Byte ranges of the sentences in `text`, in document order, trimmed of
    /// surrounding whitespace and never empty.
    fn split(&self, text: &str) -> Vec<Range<usize>>;
}

/// Default splitter based on Unicode sentence boundaries
#[derive(Debug, Clone)]
pub struct UnicodeSentenceSplitter {
    abbreviations: HashSet<String>,
}

impl Default for UnicodeSentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeSentenceSplitter {
    pub fn new() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Add extra abbreviations (without the trailing period)
    pub fn with_abbreviations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for abbr in extra {
            let abbr = abbr.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !abbr.is_empty() {
                self.abbreviations.insert(abbr);
            }
        }
        self
    }

    /// Does this fragment end in an abbreviation rather than a full stop?
    /// `rest` is the text after the fragment.
    fn ends_with_abbreviation(&self, fragment: &str, rest: &str) -> bool {
        let trimmed = fragment.trim_end();
        let Some(stem) = trimmed.strip_suffix('.') else {
            return false;
        };
        let last_word = stem
            .rsplit(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");

        if is_initial(last_word) {
            return continues_name(rest);
        }

        self.abbreviations.contains(&last_word.to_lowercase())
    }
}

/// A single capital letter, as in "John J. Smith"
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// Does `rest` start with another initial or a capitalized name?
fn continues_name(rest: &str) -> bool {
    let Some(next) = rest.split_whitespace().next() else {
        return false;
    };
    if let Some(initial) = next.strip_suffix('.') {
        if is_initial(initial) {
            return true;
        }
    }

    let word = next.trim_end_matches(|c: char| matches!(c, ',' | ';' | ':'));
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && chars.clone().next().is_some()
        && chars.all(|c| c.is_lowercase())
        && !SENTENCE_OPENERS.contains(&word.to_lowercase().as_str())
}

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        let mut pending: Option<Range<usize>> = None;

        for (start, fragment) in text.split_sentence_bound_indices() {
            let end = start + fragment.len();
            let current = match pending.take() {
                Some(open) => open.start..end,
                None => start..end,
            };

            if self.ends_with_abbreviation(&text[current.clone()], &text[end..]) {
                pending = Some(current);
            } else {
                spans.push(current);
            }
        }
        if let Some(open) = pending {
            spans.push(open);
        }

        spans
            .into_iter()
            .filter_map(|span| trim_span(text, span))
            .collect()
    }
}

fn trim_span(text: &str, span: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[span.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    let start = span.start + leading;
    let end = span.end - trailing;
    (start < end).then_some(start..end)
}

/// Sentences of one document, borrowed from its normalized text
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    spans: Vec<Range<usize>>,
}

impl<'a> Sentences<'a> {
    pub fn new(text: &'a str, splitter: &dyn SentenceSplitter) -> Self {
        Self {
            text,
            spans: splitter.split(text),
        }
    }

    /// The text the sentences were cut from
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let text = self.text;
        self.spans.iter().map(move |span| &text[span.clone()])
    }

    /// The sentence that contains byte `offset` of the text.
    ///
    /// Offsets that fall between sentences resolve to the following one.
    pub fn containing(&self, offset: usize) -> Option<&'a str> {
        let text = self.text;
        let idx = self.spans.partition_point(|span| span.end <= offset);
        self.spans.get(idx).map(|span| &text[span.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        let splitter = UnicodeSentenceSplitter::new();
        Sentences::new(text, &splitter).iter().map(String::from).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            split("Revenue grew. Margins held! Did demand soften? No."),
            vec!["Revenue grew.", "Margins held!", "Did demand soften?", "No."]
        );
    }

    #[test]
    fn test_decimals_do_not_split() {
        assert_eq!(
            split("Revenue was $1.5 billion. EPS was $0.17."),
            vec!["Revenue was $1.5 billion.", "EPS was $0.17."]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        assert_eq!(
            split("Thank you, Mr. Smith. Acme Inc. Reported results today."),
            vec!["Thank you, Mr. Smith.", "Acme Inc. Reported results today."]
        );
        assert_eq!(
            split("Our CFO, John J. Smith, will speak. Next question."),
            vec!["Our CFO, John J. Smith, will speak.", "Next question."]
        );
    }

    #[test]
    fn test_sentence_final_initial_and_no_split() {
        assert_eq!(
            split("Growth came from Plan B. We expect demand to grow."),
            vec!["Growth came from Plan B.", "We expect demand to grow."]
        );
        assert_eq!(
            split("The answer is no. The deficit in Europe widened."),
            vec!["The answer is no.", "The deficit in Europe widened."]
        );
        assert_eq!(
            split("Thanks to J. R. Ewing for the question."),
            vec!["Thanks to J. R. Ewing for the question."]
        );
    }

    #[test]
    fn test_extra_abbreviations() {
        let splitter = UnicodeSentenceSplitter::new().with_abbreviations(["Hon."]);
        let sentences = Sentences::new("The Hon. Jane Doe spoke. Thanks.", &splitter);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_containing() {
        let splitter = UnicodeSentenceSplitter::new();
        let text = "First one. Second one here.";
        let sentences = Sentences::new(text, &splitter);
        assert_eq!(sentences.containing(0), Some("First one."));
        let offset = text.find("here").unwrap();
        assert_eq!(sentences.containing(offset), Some("Second one here."));
        assert_eq!(sentences.containing(text.len()), None);
    }

    #[test]
    fn test_empty_text() {
        assert!(split("").is_empty());
    }
}
