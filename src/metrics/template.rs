//! Matcher templates
//!
//! A metric is described as data: which keyword to look for, in which order
//! the keyword and the number appear, what may sit between them, and what
//! the number must look like. [`Shape::render`] turns one of these
//! descriptions into a regular expression with a `num` group and, where the
//! shape allows one, a `unit` group.

use crate::core::units::UNIT_ALTERNATION;

/// Semantic type of a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Currency amount scaled to millions
    Millions,
    /// Raw percentage, e.g. `6.4` for 6.4%
    Percent,
    /// Raw per-share decimal
    PerShare,
}

/// Where the stages of a matcher look
#[derive(Debug, Clone, Copy)]
pub enum Scope {
    /// The whole normalized document
    Document,
    /// One sentence at a time; the first sentence with a match decides
    Sentences {
        /// Every term must appear in the sentence (lowercase)
        require_all: &'static [&'static str],
        /// At least one term must appear, when non-empty
        require_any: &'static [&'static str],
        /// Sentences containing any of these phrases belong to a narrower metric
        exclude: &'static [&'static str],
    },
}

impl Scope {
    /// Does a sentence pass this scope's filters?
    pub fn admits(&self, sentence_lower: &str) -> bool {
        match self {
            Scope::Document => true,
            Scope::Sentences {
                require_all,
                require_any,
                exclude,
            } => {
                require_all.iter().all(|t| sentence_lower.contains(t))
                    && (require_any.is_empty()
                        || require_any.iter().any(|t| sentence_lower.contains(t)))
                    && !exclude.iter().any(|t| sentence_lower.contains(t))
            }
        }
    }
}

/// How a loss is expressed for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRule {
    Unsigned,
    /// Negative on a loss marker or a `head` of "loss"; literal sign otherwise
    LossMarked,
    /// Negative on a loss marker, positive otherwise
    LossMarkedAbsolute,
}

/// Words allowed between keyword and number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    None,
    /// Up to `n` whitespace-separated words, as few as possible
    Words(u8),
    /// Any number of words, as few as possible
    AnyWords,
    /// Any characters, as few as possible
    AnyChars,
    /// Up to `n` words, as many as possible
    TrailingWords(u8),
}

impl Gap {
    fn render(self) -> String {
        match self {
            Gap::None => String::new(),
            Gap::Words(n) => format!(r"(?:\s+\w+){{0,{n}}}?"),
            Gap::AnyWords => r"(?:\s+\w+)*?".to_string(),
            Gap::AnyChars => ".*?".to_string(),
            Gap::TrailingWords(n) => format!(r"\s*(?:\w+\s*){{0,{n}}}"),
        }
    }
}

/// Linking verbs and fillers: "was", "of", "came in at", ...
#[derive(Debug, Clone, Copy)]
pub enum Link {
    None,
    Optional(&'static [&'static str]),
    Required(&'static [&'static str]),
}

impl Link {
    /// Regex alternation of the phrases; spaces match any whitespace run
    pub fn alternation(words: &[&str]) -> String {
        words
            .iter()
            .map(|w| w.replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Shape of the captured number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// Digits, commas and dots in any order
    Plain,
    /// Digits with commas, optional decimal part
    Decimal,
    /// Properly grouped thousands, or a plain decimal
    Grouped,
    /// Grouped thousands with optional decimals, or a plain decimal
    Separated,
    /// `Plain` with an optional leading minus
    Signed,
    /// A decimal with a fractional part and optional leading minus
    SignedDecimal,
    /// Digits, commas, dots and minus signs
    PerShare,
}

impl Amount {
    fn pattern(self) -> &'static str {
        match self {
            Amount::Plain => r"[\d,\.]+",
            Amount::Decimal => r"[\d,]+(?:\.\d+)?",
            Amount::Grouped => r"\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?",
            Amount::Separated => r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?",
            Amount::Signed => r"-?[\d,\.]+",
            Amount::SignedDecimal => r"-?\d+\.\d+",
            Amount::PerShare => r"[\d,\.-]+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dollar {
    Optional,
    Required,
}

/// What may follow the number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Absent,
    Optional,
    Required,
    /// A percent sign
    Percent,
}

impl Unit {
    fn render(self) -> String {
        match self {
            Unit::Absent => String::new(),
            Unit::Optional => format!(r"(?:\s*(?P<unit>{UNIT_ALTERNATION})\b)?"),
            Unit::Required => format!(r"\s*(?P<unit>{UNIT_ALTERNATION})\b"),
            Unit::Percent => r"\s*%".to_string(),
        }
    }
}

/// Which regex matches a stage considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Only the leftmost match
    First,
    /// Every match in order until one yields a value
    EachMatch,
}

/// Keyword, filler and number layout for one pattern stage.
///
/// `keyword` is a regex fragment; it may define a `head` group that
/// [`SignRule::LossMarked`] inspects.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub keyword: &'static str,
    pub gap: Gap,
    pub link: Link,
    pub qualifier: bool,
    pub dollar: Dollar,
    pub amount: Amount,
    pub unit: Unit,
    pub scan: Scan,
}

/// Starting point for table rows: `Shape { keyword: "...", ..SHAPE }`
pub const SHAPE: Shape = Shape {
    keyword: "",
    gap: Gap::None,
    link: Link::None,
    qualifier: false,
    dollar: Dollar::Optional,
    amount: Amount::Decimal,
    unit: Unit::Optional,
    scan: Scan::First,
};

/// Magnitude qualifiers allowed just before the number
pub const QUALIFIERS: &[&str] = &["approximately", "about", "around", "nearly", "over", "~"];

impl Shape {
    fn number(&self) -> String {
        let dollar = match self.dollar {
            Dollar::Optional => r"\$?",
            Dollar::Required => r"\$",
        };
        format!(
            r"{dollar}\s*(?P<num>{}){}",
            self.amount.pattern(),
            self.unit.render()
        )
    }

    fn qualifier(&self) -> String {
        if self.qualifier {
            format!(r"(?:{})?\s*", Link::alternation(QUALIFIERS))
        } else {
            String::new()
        }
    }

    /// Keyword first: `keyword gap link qualifier $ number unit`
    pub fn render_after(&self) -> String {
        let link = match self.link {
            Link::None => String::new(),
            Link::Optional(words) => format!(r"(?:{})?\s*", Link::alternation(words)),
            Link::Required(words) => format!(r"(?:{})\s*", Link::alternation(words)),
        };
        format!(
            r"(?i){}{}\s*{}{}{}",
            self.keyword,
            self.gap.render(),
            link,
            self.qualifier(),
            self.number()
        )
    }

    /// Number first: `qualifier $ number unit link gap keyword`
    pub fn render_before(&self) -> String {
        let link = match self.link {
            Link::None => String::new(),
            Link::Optional(words) => format!(r"\s*(?:{})?", Link::alternation(words)),
            Link::Required(words) => format!(r"\s+(?:{})", Link::alternation(words)),
        };
        let separator = match self.gap {
            Gap::TrailingWords(_) => "",
            _ => r"\s+",
        };
        format!(
            r"(?i){}{}{}{}{}{}",
            self.qualifier(),
            self.number(),
            link,
            self.gap.render(),
            separator,
            self.keyword
        )
    }
}

/// One step of a matcher's fallback cascade
#[derive(Debug, Clone, Copy)]
pub enum Stage {
    /// Keyword, then number
    After(Shape),
    /// Number, then keyword
    Before(Shape),
    /// First `N%` within `chars` characters from the keyword
    PercentWindow { keyword: &'static str, chars: usize },
    /// Number words followed by "cents" or "dollars"
    Spoken {
        keyword: &'static str,
        link: &'static [&'static str],
    },
    /// Any `$` literal with at least `min_digits` digits and commas, provided
    /// `gate` occurs somewhere in the document
    DollarLiteral { gate: &'static str, min_digits: usize },
    /// Run another metric's whole matcher
    Inherit(&'static str),
}

/// A metric and the cascade that finds it
#[derive(Debug, Clone, Copy)]
pub struct MetricTemplate {
    pub name: &'static str,
    pub kind: MetricKind,
    pub scope: Scope,
    pub sign: SignRule,
    pub stages: &'static [Stage],
}
