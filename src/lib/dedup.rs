//! Collapsing repeated sample records within one report.
//!
//! Reports may list a sample more than once, either because the sample was rerun or because
//! the report was assembled from overlapping files. The default policy is simple: the last
//! row seen for a sample replaces any earlier one. Fields are never merged across rows unless
//! the caller supplies its own merge function to [`dedupe_with`].

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, warn};

use crate::sample::{SampleKey, SourceTag};
use crate::table::{ReportRecord, SourceTable};

/// One record per sample, in order of each sample's first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated {
    source: SourceTag,
    header: Vec<String>,
    key_index: usize,
    records: IndexMap<SampleKey, ReportRecord>,
    duplicates: usize,
}

impl Deduplicated {
    #[must_use]
    pub fn source(&self) -> SourceTag {
        self.source
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// The surviving record per sample.
    #[must_use]
    pub fn records(&self) -> &IndexMap<SampleKey, ReportRecord> {
        &self.records
    }

    #[must_use]
    pub fn get(&self, key: &SampleKey) -> Option<&ReportRecord> {
        self.records.get(key)
    }

    /// Number of distinct samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows that collided with an earlier row for the same sample.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Rebuilds a table holding only the surviving records.
    #[must_use]
    pub fn into_table(self) -> SourceTable {
        SourceTable::new(self.source, self.header, self.key_index, self.records.into_values().collect())
    }
}

/// Keeps the last record seen for each sample.
///
/// # Example
/// ```
/// use postrun_lib::dedup::dedupe;
/// use postrun_lib::loader::load;
/// use postrun_lib::sample::{SampleKey, SourceTag};
///
/// let rows = vec![
///     vec!["taxon".to_string(), "lineage".to_string()],
///     vec!["S1 ref".to_string(), "B.1".to_string()],
///     vec!["S1 ref".to_string(), "B.1.1.7".to_string()],
/// ];
/// let deduped = dedupe(load(SourceTag::Lineage, rows).unwrap());
/// assert_eq!(deduped.len(), 1);
/// assert_eq!(deduped.get(&SampleKey::from("S1")).unwrap().get(1), Some("B.1.1.7"));
/// ```
#[must_use]
pub fn dedupe(table: SourceTable) -> Deduplicated {
    dedupe_with(table, |_existing, incoming| incoming)
}

/// Collapses records sharing a sample key using `merge(existing, incoming)`.
///
/// Records are visited in table order; the value returned by `merge` becomes the stored
/// record for the key. Each sample keeps the position of its first appearance.
pub fn dedupe_with<F>(table: SourceTable, mut merge: F) -> Deduplicated
where
    F: FnMut(ReportRecord, ReportRecord) -> ReportRecord,
{
    let (source, header, key_index, rows) = table.into_parts();
    let mut records: IndexMap<SampleKey, ReportRecord> = IndexMap::with_capacity(rows.len());
    let mut duplicates = 0usize;

    for record in rows {
        match records.entry(record.key.clone()) {
            Entry::Occupied(mut slot) => {
                duplicates += 1;
                debug!("Sample '{}' appears more than once in the {source} report", record.key);
                let existing = std::mem::take(slot.get_mut());
                *slot.get_mut() = merge(existing, record);
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    if duplicates > 0 {
        warn!(
            "Found {duplicates} duplicate row(s) in the {source} report; keeping one record per sample"
        );
    }

    Deduplicated { source, header, key_index, records, duplicates }
}
