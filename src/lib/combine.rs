//! Outer-joining reports into one table keyed by sample.
//!
//! The summary report is the base of the [`CombinedTable`]. Coverage, lineage and clade
//! reports are then merged one after another, in that order, each against the cumulative
//! result of the previous merges:
//!
//! 1. the source is deduplicated so each sample contributes at most one row;
//! 2. every column of the source is renamed with the source prefix (`coverage_`, `lineage_`,
//!    `clade_`) so column names stay unique;
//! 3. rows are joined on the sample key; samples missing from the table are appended as new
//!    rows whose earlier columns are null;
//! 4. fallback columns still null in the table are filled from the source;
//! 5. the prefixed join column (e.g. `lineage_taxon`) is dropped.
//!
//! A source that was never produced is skipped and leaves the table untouched. The only fatal
//! condition is a missing summary report.

use std::collections::BTreeSet;

use ahash::AHashMap;
use log::{info, warn};

use crate::dedup::{Deduplicated, dedupe};
use crate::errors::{PostrunError, Result};
use crate::project::{ProjectedTable, project};
use crate::sample::{OptionalSource, SampleKey, SourceTag};
use crate::table::{SourceTable, Value};

/// Mean depth of the trimmed alignments; filled from the coverage `meandepth` when missing.
pub const DEPTH_AFTER_TRIMMING: &str = "depth_after_trimming";

/// Breadth of 1X coverage of the trimmed alignments; filled from the coverage `coverage` when
/// missing.
pub const COVERAGE_AFTER_TRIMMING: &str = "1X_coverage_after_trimming";

/// Summary columns that other sources may fill in.
pub const FALLBACK_COLUMNS: [&str; 2] = [DEPTH_AFTER_TRIMMING, COVERAGE_AFTER_TRIMMING];

/// Fills a null base column from a column of the merged source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRule {
    /// Unprefixed base column to fill.
    pub target: &'static str,
    /// Unprefixed source column providing the value.
    pub source_column: &'static str,
}

/// How one source is merged into the combined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSpec {
    pub source: SourceTag,
    /// Source column whose normalized value is matched against the table's sample key.
    pub join_column: &'static str,
    pub fallbacks: Vec<FallbackRule>,
}

impl MergeSpec {
    /// The standard merge for `source`. Only coverage carries fallback rules.
    #[must_use]
    pub fn for_source(source: SourceTag) -> Self {
        let fallbacks = match source {
            SourceTag::Coverage => vec![
                FallbackRule { target: DEPTH_AFTER_TRIMMING, source_column: "meandepth" },
                FallbackRule { target: COVERAGE_AFTER_TRIMMING, source_column: "coverage" },
            ],
            _ => Vec::new(),
        };
        Self { source, join_column: source.key_column(), fallbacks }
    }
}

/// Where a combined-table column came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnOrigin {
    /// A column of the summary report.
    Base,
    /// A summary column that merged sources may fill in.
    Fallback,
    /// A prefixed column contributed by a merged source.
    Source(SourceTag),
    /// The prefixed join column of a source; only present while that source is being merged.
    JoinHelper(SourceTag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub origin: ColumnOrigin,
}

impl Column {
    fn new(name: impl Into<String>, origin: ColumnOrigin) -> Self {
        Self { name: name.into(), origin }
    }
}

/// One sample's row; `values` is aligned with [`CombinedTable::columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRow {
    pub key: SampleKey,
    pub values: Vec<Value>,
}

/// The summary table progressively widened by merged sources.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    key_column: String,
    columns: Vec<Column>,
    rows: Vec<CombinedRow>,
    index: AHashMap<SampleKey, usize>,
    merged: Vec<SourceTag>,
}

impl CombinedTable {
    /// Builds the base table from the summary report.
    ///
    /// Duplicate samples in the summary are collapsed (last row wins). The fallback columns
    /// are appended as all-null columns unless the summary already has them, in which case
    /// their values are kept.
    #[must_use]
    pub fn from_summary(summary: SourceTable) -> Self {
        let deduped = dedupe(summary);
        let key_index = deduped.key_index();
        let key_column = deduped.header()[key_index].clone();

        let mut columns: Vec<Column> = deduped
            .header()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key_index)
            .map(|(_, name)| {
                let origin = if FALLBACK_COLUMNS.contains(&name.as_str()) {
                    ColumnOrigin::Fallback
                } else {
                    ColumnOrigin::Base
                };
                Column::new(name.clone(), origin)
            })
            .collect();
        let missing_fallbacks: Vec<&str> = FALLBACK_COLUMNS
            .iter()
            .copied()
            .filter(|f| !columns.iter().any(|c| c.name == *f))
            .collect();
        columns.extend(missing_fallbacks.iter().map(|f| Column::new(*f, ColumnOrigin::Fallback)));

        let mut rows = Vec::with_capacity(deduped.len());
        let mut index = AHashMap::with_capacity(deduped.len());
        let (_, _, _, records) = deduped.into_table().into_parts();
        for record in records {
            let mut values: Vec<Value> = record
                .values
                .into_iter()
                .enumerate()
                .filter(|(i, _)| *i != key_index)
                .map(|(_, v)| v)
                .collect();
            values.resize(columns.len(), None);
            index.insert(record.key.clone(), rows.len());
            rows.push(CombinedRow { key: record.key, values });
        }

        Self { key_column, columns, rows, index, merged: Vec::new() }
    }

    /// Name of the sample key column (the summary's `Sample`).
    #[must_use]
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Non-key columns, in table order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, key: &SampleKey) -> Option<&CombinedRow> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Value of `column` for the sample `key`; `None` if either is unknown or the cell is null.
    #[must_use]
    pub fn value(&self, key: &SampleKey, column: &str) -> Option<&str> {
        let column = self.column_index(column)?;
        self.row(key).and_then(|row| row.values[column].as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sources merged so far, in merge order.
    #[must_use]
    pub fn merged_sources(&self) -> &[SourceTag] {
        &self.merged
    }

    fn push_columns(&mut self, columns: Vec<Column>) {
        let width = self.columns.len() + columns.len();
        self.columns.extend(columns);
        for row in &mut self.rows {
            row.values.resize(width, None);
        }
    }

    fn drop_columns(&mut self, origin: ColumnOrigin) {
        let keep: Vec<bool> = self.columns.iter().map(|c| c.origin != origin).collect();
        if keep.iter().all(|&k| k) {
            return;
        }
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.values.retain(|_| *flags.next().unwrap_or(&true));
        }
        self.columns.retain(|c| c.origin != origin);
    }

    /// Full outer join of `source` into this table, followed by fallback fill and removal of
    /// the join helper column.
    fn outer_join(&mut self, source: Deduplicated, spec: &MergeSpec) -> MergeStats {
        let tag = spec.source;
        let existing_rows = self.rows.len();
        let existing_width = self.columns.len();

        // Map each source column to its position in the widened table.
        let mut incoming: Vec<Column> = Vec::new();
        let mut targets: Vec<Option<usize>> = Vec::with_capacity(source.header().len());
        for (i, name) in source.header().iter().enumerate() {
            let prefixed = tag.prefixed(name);
            let origin = if i == source.key_index() {
                ColumnOrigin::JoinHelper(tag)
            } else {
                ColumnOrigin::Source(tag)
            };
            if self.column_index(&prefixed).is_some() || incoming.iter().any(|c| c.name == prefixed) {
                warn!("Ignoring {tag} column '{name}': '{prefixed}' already exists in the combined table");
                targets.push(None);
            } else {
                targets.push(Some(existing_width + incoming.len()));
                incoming.push(Column::new(prefixed, origin));
            }
        }
        let fallbacks = self.resolve_fallbacks(&source, spec);
        let columns_added = incoming.iter().filter(|c| c.origin == ColumnOrigin::Source(tag)).count();
        self.push_columns(incoming);
        let width = self.columns.len();

        let records = source.records().len();
        let duplicates = source.duplicates();
        let mut matched = 0usize;
        let mut added = 0usize;
        let mut fallback_filled = 0usize;
        for (key, record) in source.records() {
            let row_index = if let Some(&i) = self.index.get(key) {
                matched += 1;
                i
            } else {
                added += 1;
                self.index.insert(key.clone(), self.rows.len());
                self.rows.push(CombinedRow { key: key.clone(), values: vec![None; width] });
                self.rows.len() - 1
            };
            let row = &mut self.rows[row_index];
            for (value, target) in record.values.iter().zip(&targets) {
                if let Some(t) = target {
                    row.values[*t].clone_from(value);
                }
            }
            for &(target, from) in &fallbacks {
                if row.values[target].is_none() && record.values[from].is_some() {
                    row.values[target].clone_from(&record.values[from]);
                    fallback_filled += 1;
                }
            }
        }

        self.drop_columns(ColumnOrigin::JoinHelper(tag));
        self.merged.push(tag);

        MergeStats {
            source: tag,
            records,
            duplicates,
            matched,
            added,
            unmatched: existing_rows - matched,
            columns_added,
            fallback_filled,
        }
    }

    /// Pairs each fallback rule's target column in this table with the index of its value in
    /// the source records. Rules whose columns are missing are logged and skipped.
    ///
    /// Values are read from the source records, not from the prefixed table columns, so a
    /// summary column that shadows a prefixed source column never feeds the fallback.
    fn resolve_fallbacks(&self, source: &Deduplicated, spec: &MergeSpec) -> Vec<(usize, usize)> {
        let tag = spec.source;
        spec.fallbacks
            .iter()
            .filter_map(|rule| {
                let target = self
                    .columns
                    .iter()
                    .position(|c| c.origin == ColumnOrigin::Fallback && c.name == rule.target);
                let from = source.header().iter().position(|h| h == rule.source_column);
                match (target, from) {
                    (Some(target), Some(from)) => Some((target, from)),
                    _ => {
                        warn!(
                            "Cannot fill '{}' from the {tag} report: '{}' not present",
                            rule.target, rule.source_column
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// An optional source as handed to the combiner.
#[derive(Debug, Clone, Default)]
pub enum SourceInput {
    /// The report was never produced.
    #[default]
    Absent,
    /// The report exists but could not be used; the reason is logged and reported.
    Unusable(String),
    Loaded(SourceTable),
}

impl SourceInput {
    /// Wraps the result of loading a report, turning a failure into [`SourceInput::Unusable`].
    pub fn from_load(result: anyhow::Result<SourceTable>) -> Self {
        match result {
            Ok(table) => SourceInput::Loaded(table),
            Err(e) => SourceInput::Unusable(format!("{e:#}")),
        }
    }
}

impl From<Option<SourceTable>> for SourceInput {
    fn from(table: Option<SourceTable>) -> Self {
        table.map_or(SourceInput::Absent, SourceInput::Loaded)
    }
}

impl From<SourceTable> for SourceInput {
    fn from(table: SourceTable) -> Self {
        SourceInput::Loaded(table)
    }
}

/// Counts describing one completed merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub source: SourceTag,
    /// Distinct samples in the source after deduplication.
    pub records: usize,
    /// Source rows discarded by deduplication.
    pub duplicates: usize,
    /// Source samples already present in the table.
    pub matched: usize,
    /// Source samples appended as new rows.
    pub added: usize,
    /// Table rows with no counterpart in the source.
    pub unmatched: usize,
    /// Columns the source contributed to the table.
    pub columns_added: usize,
    /// Null fallback cells filled from the source.
    pub fallback_filled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Absent,
    Unusable(String),
}

/// Result of one merge stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged(MergeStats),
    Skipped { source: SourceTag, reason: SkipReason },
}

impl MergeOutcome {
    #[must_use]
    pub fn source(&self) -> SourceTag {
        match self {
            MergeOutcome::Merged(stats) => stats.source,
            MergeOutcome::Skipped { source, .. } => *source,
        }
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged(_))
    }
}

/// Merges one optional source into `base`.
///
/// An absent or unusable source leaves `base` unchanged and yields
/// [`MergeOutcome::Skipped`].
#[must_use]
pub fn combine(
    mut base: CombinedTable,
    input: SourceInput,
    spec: &MergeSpec,
) -> (CombinedTable, MergeOutcome) {
    let source = spec.source;
    let skip = |reason: SkipReason| MergeOutcome::Skipped { source, reason };

    let table = match input {
        SourceInput::Absent => {
            info!("No {source} report was produced; skipping the {source} merge");
            return (base, skip(SkipReason::Absent));
        }
        SourceInput::Unusable(reason) => {
            warn!("Skipping the {source} merge: {reason}");
            return (base, skip(SkipReason::Unusable(reason)));
        }
        SourceInput::Loaded(table) => table,
    };

    if table.key_column() != spec.join_column {
        let reason = format!(
            "expected the {source} report to be keyed on '{}', found '{}'",
            spec.join_column,
            table.key_column()
        );
        warn!("Skipping the {source} merge: {reason}");
        return (base, skip(SkipReason::Unusable(reason)));
    }

    info!("Merging {} {source} record(s)", table.len());
    let stats = base.outer_join(dedupe(table), spec);
    (base, MergeOutcome::Merged(stats))
}

/// All reports available for one run.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub summary: Option<SourceTable>,
    pub coverage: SourceInput,
    pub lineage: SourceInput,
    pub clade: SourceInput,
}

impl ReportInputs {
    /// Inputs with the given summary and no optional sources.
    #[must_use]
    pub fn new(summary: SourceTable) -> Self {
        Self { summary: Some(summary), ..Self::default() }
    }

    /// Sets the input for an optional source.
    #[must_use]
    pub fn with_source(mut self, source: OptionalSource, input: impl Into<SourceInput>) -> Self {
        let input = input.into();
        match source {
            OptionalSource::Coverage => self.coverage = input,
            OptionalSource::Lineage => self.lineage = input,
            OptionalSource::Clade => self.clade = input,
        }
        self
    }
}

/// The combined table and how each optional source fared.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub table: CombinedTable,
    pub outcomes: Vec<MergeOutcome>,
}

impl Reconciliation {
    /// Sources that were merged into the table.
    #[must_use]
    pub fn merged_sources(&self) -> BTreeSet<SourceTag> {
        self.outcomes.iter().filter(|o| o.is_merged()).map(MergeOutcome::source).collect()
    }

    /// The final output table.
    #[must_use]
    pub fn project(&self) -> ProjectedTable {
        project(&self.table, &self.merged_sources())
    }
}

/// Joins every available report onto the summary.
///
/// Optional sources are merged in [`SourceTag::MERGE_ORDER`], each against the result of the
/// previous merge.
///
/// # Errors
///
/// Returns [`PostrunError::MissingSummary`] if there is no summary table.
pub fn reconcile(inputs: ReportInputs) -> Result<Reconciliation> {
    let ReportInputs { summary, coverage, lineage, clade } = inputs;
    let summary = summary.ok_or(PostrunError::MissingSummary)?;

    let base = CombinedTable::from_summary(summary);
    info!("Summary report has {} sample(s)", base.len());

    let sources = SourceTag::MERGE_ORDER.into_iter().zip([coverage, lineage, clade]);
    let (table, outcomes) =
        sources.fold((base, Vec::new()), |(table, mut outcomes), (source, input)| {
            let (table, outcome) = combine(table, input, &MergeSpec::for_source(source));
            outcomes.push(outcome);
            (table, outcomes)
        });

    Ok(Reconciliation { table, outcomes })
}
