//! Callsheet Error Types
//!
//! Only failures that should halt a run live here. A metric or category
//! that finds nothing is not an error and never reaches this type.

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for Callsheet
#[derive(Error, Debug)]
pub enum CallsheetError {
    #[error("Required input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid matcher pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Callsheet operations
pub type CallsheetResult<T> = Result<T, CallsheetError>;

impl CallsheetError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        CallsheetError::MissingInput { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_names_path() {
        let err = CallsheetError::missing("data/transcripts");
        assert_eq!(
            err.to_string(),
            "Required input not found: data/transcripts"
        );
    }

    #[test]
    fn test_pattern_error_converts() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err: CallsheetError = bad.into();
        assert!(matches!(err, CallsheetError::Pattern(_)));
    }
}
