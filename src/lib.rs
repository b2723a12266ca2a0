//! Callsheet Library
//!
//! Extracts financial metrics, narrative sentences and document identity
//! from earnings call transcripts.

pub mod batch;
pub mod config;
pub mod core;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod metrics;
pub mod narrative;
pub mod record;

pub use error::{CallsheetError, CallsheetResult};
pub use extractor::{Extractor, ExtractorOptions};
pub use record::{RawDocument, TranscriptRecord};
