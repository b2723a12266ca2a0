use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CallsheetError, CallsheetResult};

/// Batch and extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Batch
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    /// File extension of transcripts, without the dot
    pub extension: String,
    pub parallel: bool,

    // Identity
    pub header_lines: usize,
    pub filename_delimiter: String,

    // Segmentation
    pub extra_abbreviations: Vec<String>,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/transcripts"),
            output_file: PathBuf::from("data/parsed_transcripts.json"),
            extension: "txt".to_string(),
            parallel: true,
            header_lines: 3,
            filename_delimiter: "_".to_string(),
            extra_abbreviations: Vec::new(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> CallsheetResult<Self> {
        let config_path = config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path. The file must exist; a file that
    /// does not parse is moved aside and defaults are used.
    pub fn load_from(config_path: &Path) -> CallsheetResult<Self> {
        if !config_path.exists() {
            return Err(CallsheetError::missing(config_path));
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> CallsheetResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> CallsheetResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("callsheet")
        .join("config.json")
}
