//! Batch runner
//!
//! Finds transcripts in a directory, reads them, runs the extractor and
//! writes one JSON array. This is the only place that touches the
//! filesystem.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{CallsheetError, CallsheetResult};
use crate::extractor::Extractor;
use crate::record::{RawDocument, TranscriptRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub metrics_found: usize,
}

/// Transcript files directly under `dir` with the given extension, sorted
/// by path
pub fn discover(dir: &Path, extension: &str) -> CallsheetResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CallsheetError::missing(dir));
    }

    let wanted = extension.trim_start_matches('.').to_lowercase();
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase() == wanted)
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Read transcripts. Invalid UTF-8 is replaced with U+FFFD; a file that
/// has disappeared since discovery is fatal.
pub fn load_documents(paths: &[PathBuf]) -> CallsheetResult<Vec<RawDocument>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CallsheetError::missing(path),
                _ => CallsheetError::Io(e),
            })?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    warn!("⚠️ {} is not valid UTF-8, decoding lossily", path.display());
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            Ok(RawDocument::new(path.clone(), text))
        })
        .collect()
}

/// Write records as a pretty-printed JSON array, creating parent directories
pub fn write_records(path: &Path, records: &[TranscriptRecord]) -> CallsheetResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Discover, extract and write according to `config`
pub fn run(config: &Config) -> CallsheetResult<BatchSummary> {
    let paths = discover(&config.input_dir, &config.extension)?;
    info!(
        "📂 Found {} transcript(s) in {}",
        paths.len(),
        config.input_dir.display()
    );

    let documents = load_documents(&paths)?;
    let extractor = Extractor::from_config(config)?;
    let records = extractor.extract_all(&documents);

    write_records(&config.output_file, &records)?;

    let summary = BatchSummary {
        documents: records.len(),
        metrics_found: records.iter().map(|r| r.metrics.len()).sum(),
    };
    info!(
        "✅ Parsed {} transcript(s) into {} ({} metric values)",
        summary.documents,
        config.output_file.display(),
        summary.metrics_found
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_Q1.txt"), "b").unwrap();
        fs::write(dir.path().join("a_Q1.TXT"), "a").unwrap();
        fs::write(dir.path().join("notes.md"), "n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c_Q1.txt"), "c").unwrap();

        let found = discover(dir.path(), "txt").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_Q1.TXT", "b_Q1.txt"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover(&missing, "txt").unwrap_err();
        assert!(matches!(err, CallsheetError::MissingInput { ref path } if path == &missing));
    }

    #[test]
    fn test_load_documents_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, b"Revenue was \xff$5 billion.").unwrap();

        let docs = load_documents(&[path.clone()]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, path);
        assert!(docs[0].text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_load_documents_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.txt");
        let err = load_documents(&[gone.clone()]).unwrap_err();
        assert!(matches!(err, CallsheetError::MissingInput { ref path } if path == &gone));
    }

    #[test]
    fn test_write_records_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("parsed.json");
        write_records(&out, &[]).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[]");
    }
}
