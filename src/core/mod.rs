//! Core text processing
//!
//! Whitespace normalization, amount and unit normalization, spoken-number
//! decoding and sentence segmentation shared by the matchers and the
//! classifier.

pub mod sentences;
pub mod spoken;
pub mod text_normalizer;
pub mod units;

pub use sentences::{SentenceSplitter, Sentences, UnicodeSentenceSplitter};
pub use spoken::decode_spoken;
pub use text_normalizer::normalize_whitespace;
pub use units::{normalize_amount, parse_plain, round3, ScaleUnit};
