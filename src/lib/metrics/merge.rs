//! Per-source merge metrics.

use serde::{Deserialize, Serialize};

use super::Metric;
use crate::combine::{MergeOutcome, SkipReason};

/// One row per optional source describing how its merge went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeMetric {
    /// Source name (`coverage`, `lineage` or `clade`)
    pub source: String,
    /// `merged`, `absent` or `unusable`
    pub status: String,
    /// Distinct samples in the source
    pub records: usize,
    /// Rows discarded as duplicates
    pub duplicates: usize,
    /// Samples already present in the combined table
    pub matched: usize,
    /// Samples appended as new rows
    pub added: usize,
    /// Combined-table samples missing from this source
    pub unmatched: usize,
    /// Columns this source contributed
    pub columns_added: usize,
    /// Fallback cells filled from this source
    pub fallback_filled: usize,
}

impl Metric for MergeMetric {
    fn metric_name() -> &'static str {
        "merge"
    }
}

impl From<&MergeOutcome> for MergeMetric {
    fn from(outcome: &MergeOutcome) -> Self {
        match outcome {
            MergeOutcome::Merged(stats) => Self {
                source: stats.source.to_string(),
                status: "merged".to_string(),
                records: stats.records,
                duplicates: stats.duplicates,
                matched: stats.matched,
                added: stats.added,
                unmatched: stats.unmatched,
                columns_added: stats.columns_added,
                fallback_filled: stats.fallback_filled,
            },
            MergeOutcome::Skipped { source, reason } => Self {
                source: source.to_string(),
                status: match reason {
                    SkipReason::Absent => "absent",
                    SkipReason::Unusable(_) => "unusable",
                }
                .to_string(),
                ..Self::default()
            },
        }
    }
}
