//! Report sources and sample identifier normalization.
//!
//! Every report produced by the pipeline names its samples a little differently. The lineage
//! and clade assigners label each sequence as `<sample> <reference>`, while the summary and
//! coverage reports already use the bare sample name. [`normalize`] maps a raw label to the
//! canonical [`SampleKey`] used to join all reports together.

use std::fmt;

/// One of the four report kinds that feed the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
    /// Variant-calling summary metrics; the join base.
    Summary,
    /// Per-sample coverage and depth metrics.
    Coverage,
    /// Lineage assignments.
    Lineage,
    /// Clade assignments and sequence QC.
    Clade,
}

const COVERAGE_COLUMNS: &[&str] = &["Sample", "coverage", "meandepth"];
const CLADE_COLUMNS: &[&str] = &["seqName", "qc.overallScore", "qc.overallStatus"];

impl SourceTag {
    /// The optional sources, in the order they are merged into the summary table.
    pub const MERGE_ORDER: [SourceTag; 3] = [SourceTag::Coverage, SourceTag::Lineage, SourceTag::Clade];

    /// Lower-case name of the source, also used as its column prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SourceTag::Summary => "summary",
            SourceTag::Coverage => "coverage",
            SourceTag::Lineage => "lineage",
            SourceTag::Clade => "clade",
        }
    }

    /// Prefix applied to every column this source contributes to the combined table.
    #[must_use]
    pub fn prefix(self) -> String {
        format!("{}_", self.name())
    }

    /// Returns `column` with this source's provenance prefix.
    #[must_use]
    pub fn prefixed(self, column: &str) -> String {
        format!("{}{column}", self.prefix())
    }

    /// Name of the column holding the raw sample label.
    #[must_use]
    pub fn key_column(self) -> &'static str {
        match self {
            SourceTag::Summary | SourceTag::Coverage => "Sample",
            SourceTag::Lineage => "taxon",
            SourceTag::Clade => "seqName",
        }
    }

    /// First field of a header line for sources that may be concatenations of several files.
    #[must_use]
    pub fn header_sentinel(self) -> Option<&'static str> {
        match self {
            SourceTag::Lineage => Some("taxon"),
            SourceTag::Clade => Some("seqName"),
            SourceTag::Summary | SourceTag::Coverage => None,
        }
    }

    /// Field delimiter of the report on disk.
    #[must_use]
    pub fn delimiter(self) -> u8 {
        match self {
            SourceTag::Clade => b';',
            _ => b',',
        }
    }

    /// Columns kept when loading this source, or `None` to keep them all.
    #[must_use]
    pub fn columns_of_interest(self) -> Option<&'static [&'static str]> {
        match self {
            SourceTag::Coverage => Some(COVERAGE_COLUMNS),
            SourceTag::Clade => Some(CLADE_COLUMNS),
            SourceTag::Summary | SourceTag::Lineage => None,
        }
    }

    /// True if raw labels from this source carry a trailing reference name.
    #[must_use]
    pub fn has_label_suffix(self) -> bool {
        matches!(self, SourceTag::Lineage | SourceTag::Clade)
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A report that may be merged into the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionalSource {
    Coverage,
    Lineage,
    Clade,
}

impl OptionalSource {
    /// The optional sources, in merge order.
    pub const ALL: [OptionalSource; 3] =
        [OptionalSource::Coverage, OptionalSource::Lineage, OptionalSource::Clade];

    #[must_use]
    pub fn tag(self) -> SourceTag {
        match self {
            OptionalSource::Coverage => SourceTag::Coverage,
            OptionalSource::Lineage => SourceTag::Lineage,
            OptionalSource::Clade => SourceTag::Clade,
        }
    }
}

impl From<OptionalSource> for SourceTag {
    fn from(source: OptionalSource) -> Self {
        source.tag()
    }
}

impl fmt::Display for OptionalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag().fmt(f)
    }
}

/// Canonical identifier of one biological sample, shared by all reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SampleKey(String);

impl SampleKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the degenerate bucket that collects rows with an empty label.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SampleKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extracts the canonical sample key from a raw label.
///
/// Lineage and clade labels look like `S1 MN908947.3`; everything from the first whitespace
/// character onwards is dropped. Summary and coverage labels are already canonical. A label
/// without whitespace is returned whole, and an empty label yields the empty key.
///
/// # Examples
///
/// ```
/// use postrun_lib::sample::{SourceTag, normalize};
///
/// assert_eq!(normalize("S1 ref123.fasta", SourceTag::Lineage).as_str(), "S1");
/// assert_eq!(normalize("S1\tMN908947.3", SourceTag::Clade).as_str(), "S1");
/// assert_eq!(normalize("S1 ref", SourceTag::Summary).as_str(), "S1 ref");
/// assert_eq!(normalize("S2", SourceTag::Lineage).as_str(), "S2");
/// ```
#[must_use]
pub fn normalize(raw_label: &str, source: SourceTag) -> SampleKey {
    if source.has_label_suffix() {
        let head = raw_label.split_once(char::is_whitespace).map_or(raw_label, |(head, _)| head);
        SampleKey::new(head)
    } else {
        SampleKey::new(raw_label)
    }
}
