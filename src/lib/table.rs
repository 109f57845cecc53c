//! In-memory representation of one loaded report.

use crate::sample::{SampleKey, SourceTag};

/// A single cell. `None` is a null (an empty cell in the report).
pub type Value = Option<String>;

/// One data row of a report, aligned with its table's header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportRecord {
    /// Normalized key of the sample this row describes.
    pub key: SampleKey,
    /// Cell values in header order, including the raw key column.
    pub values: Vec<Value>,
}

impl ReportRecord {
    #[must_use]
    pub fn new(key: SampleKey, values: Vec<Value>) -> Self {
        Self { key, values }
    }

    /// Value at `index`, or `None` if the cell is null or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// The rows of one report, with a declared header and a designated key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    source: SourceTag,
    header: Vec<String>,
    key_index: usize,
    records: Vec<ReportRecord>,
}

impl SourceTable {
    /// Creates a table. `key_index` must be a valid index into `header`.
    ///
    /// # Panics
    ///
    /// Panics if `key_index` is out of range for `header`.
    #[must_use]
    pub fn new(
        source: SourceTag,
        header: Vec<String>,
        key_index: usize,
        records: Vec<ReportRecord>,
    ) -> Self {
        assert!(key_index < header.len(), "key column {key_index} outside header of {}", header.len());
        Self { source, header, key_index, records }
    }

    #[must_use]
    pub fn source(&self) -> SourceTag {
        self.source
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Index of the key column within the header.
    #[must_use]
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Name of the key column.
    #[must_use]
    pub fn key_column(&self) -> &str {
        &self.header[self.key_index]
    }

    /// Position of `column` in the header.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|c| c == column)
    }

    #[must_use]
    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (SourceTag, Vec<String>, usize, Vec<ReportRecord>) {
        (self.source, self.header, self.key_index, self.records)
    }
}
