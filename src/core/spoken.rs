//! Spoken-number decoding
//!
//! Small figures read aloud on a call are often spoken as digit groups:
//! "three eighteen" is 318, "one oh five" is 105. The decoder concatenates
//! the groups instead of doing arithmetic on them.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref NUMBER_WORDS: HashMap<&'static str, u32> = HashMap::from([
        ("zero", 0),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("thirteen", 13),
        ("fourteen", 14),
        ("fifteen", 15),
        ("sixteen", 16),
        ("seventeen", 17),
        ("eighteen", 18),
        ("nineteen", 19),
        ("twenty", 20),
        ("thirty", 30),
        ("forty", 40),
        ("fifty", 50),
        ("sixty", 60),
        ("seventy", 70),
        ("eighty", 80),
        ("ninety", 90),
        ("hundred", 100),
    ]);
}

/// Decode a run of spoken digit groups at the start of `span`.
///
/// Stops at the first token that is not a number word below one hundred,
/// the filler "oh"/"o", or a digit run.
pub fn decode_spoken(span: &str) -> Option<u64> {
    let lowered = span.to_lowercase();
    let mut digits = String::new();

    for token in lowered.split_whitespace() {
        match NUMBER_WORDS.get(token) {
            Some(&value) if value < 100 => digits.push_str(&value.to_string()),
            _ if token == "oh" || token == "o" => digits.push('0'),
            _ if token.chars().all(|c| c.is_ascii_digit()) => digits.push_str(token),
            _ => break,
        }
    }

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
