//! Financial metric extraction
//!
//! Every metric is a row in a static table ([`table::METRIC_TEMPLATES`]) and
//! one interpreter ([`MetricRegistry`]) runs them all.

pub mod registry;
pub mod table;
pub mod template;

pub use registry::{MetricRecord, MetricRegistry};
pub use template::{MetricKind, MetricTemplate, Scope, SignRule, Stage};
