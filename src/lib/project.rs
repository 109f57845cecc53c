//! Selecting and ordering the output columns.

use std::collections::BTreeSet;

use crate::combine::{ColumnOrigin, CombinedTable};
use crate::sample::SourceTag;
use crate::table::{SourceTable, Value};

/// The final report: a header and rows of nullable cells, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedTable {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ProjectedTable {
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|c| c == column)
    }

    /// Value of `column` in the first row whose leading (key) cell is `key`.
    #[must_use]
    pub fn value(&self, key: &str, column: &str) -> Option<&str> {
        let column = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row.first().and_then(|v| v.as_deref()).unwrap_or("") == key)
            .and_then(|row| row[column].as_deref())
    }
}

impl From<&SourceTable> for ProjectedTable {
    fn from(table: &SourceTable) -> Self {
        Self {
            header: table.header().to_vec(),
            rows: table.records().iter().map(|r| r.values.clone()).collect(),
        }
    }
}

/// Orders the combined table's columns for output.
///
/// The key column comes first, then the summary's own columns (including the fallback
/// columns) in their original order, then the columns of each source in `available`, in
/// merge order. Sources that were not merged contribute nothing.
#[must_use]
pub fn project(combined: &CombinedTable, available: &BTreeSet<SourceTag>) -> ProjectedTable {
    let base = combined
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c.origin, ColumnOrigin::Base | ColumnOrigin::Fallback))
        .map(|(i, _)| i);
    let sourced = SourceTag::MERGE_ORDER
        .into_iter()
        .filter(|tag| available.contains(tag) && combined.merged_sources().contains(tag))
        .flat_map(move |tag| {
            combined
                .columns()
                .iter()
                .enumerate()
                .filter(move |(_, c)| c.origin == ColumnOrigin::Source(tag))
                .map(|(i, _)| i)
        });
    let selected: Vec<usize> = base.chain(sourced).collect();

    let mut header = Vec::with_capacity(selected.len() + 1);
    header.push(combined.key_column().to_string());
    header.extend(selected.iter().map(|&i| combined.columns()[i].name.clone()));

    let rows = combined
        .rows()
        .iter()
        .map(|row| {
            let mut values = Vec::with_capacity(header.len());
            values.push(Some(row.key.as_str().to_string()).filter(|k| !k.is_empty()));
            values.extend(selected.iter().map(|&i| row.values[i].clone()));
            values
        })
        .collect();

    ProjectedTable { header, rows }
}
