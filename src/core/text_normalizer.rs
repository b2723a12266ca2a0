//! Text Normalization
//!
//! Every matcher and the sentence classifier work on single-spaced text so
//! that patterns never have to care about line wrapping in the transcript.

/// Collapse every run of whitespace (spaces, tabs, newlines) into one space
/// and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Leading lines of a raw document, used where line structure still matters
/// (the transcript header).
pub fn first_lines(text: &str, count: usize) -> String {
    text.lines().take(count).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_whitespace("  Revenue   was\n\n$5 billion.\t "), "Revenue was $5 billion.");
    }

    #[test]
    fn test_normalize_idempotent() {
        let raw = "Good morning,\r\n  everyone.\tWelcome to the\n\nQ2 call.";
        let once = normalize_whitespace(raw);
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_first_lines() {
        let text = "Acme Corp (NYSE:ACME)\nQ2 2024 Earnings Call\nJuly 30, 2024\nOperator: hello";
        assert_eq!(
            first_lines(text, 3),
            "Acme Corp (NYSE:ACME)\nQ2 2024 Earnings Call\nJuly 30, 2024"
        );
        assert_eq!(first_lines(text, 0), "");
    }
}
