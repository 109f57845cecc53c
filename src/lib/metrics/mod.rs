//! Metrics describing a reconciliation run.
//!
//! - [`merge`] - Per-source merge metrics
//! - [`writer`] - Metrics file I/O utilities

pub mod merge;
pub mod writer;

use serde::{Deserialize, Serialize};

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type.
    ///
    /// Used in error messages and logging when writing metrics files.
    fn metric_name() -> &'static str;
}

pub use merge::MergeMetric;
pub use writer::write_metrics;
