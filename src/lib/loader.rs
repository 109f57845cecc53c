//! Loading reports into [`SourceTable`]s.
//!
//! [`load`] turns raw delimited rows into a table for one source: it locates the header,
//! keeps the source's columns of interest and normalizes each row's sample label.
//! [`load_files`] is the file front-end; it concatenates the rows of one or more (optionally
//! gzipped) files before loading them, which is how per-sample lineage and clade reports are
//! combined.

use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::Io;
use log::{debug, warn};

use crate::errors::PostrunError;
use crate::sample::{SampleKey, SourceTag, normalize};
use crate::table::{ReportRecord, SourceTable, Value};

/// One delimited line of a report, split into fields.
pub type RawRow = Vec<String>;

/// Builds a [`SourceTable`] from raw rows.
///
/// For summary and coverage reports the first row is the header. Lineage and clade reports
/// are often concatenations of several files that each repeat the header, so for those only
/// rows whose first field is the source's header sentinel are header rows: the first one
/// defines the header and later ones are dropped. Data rows appearing before any header
/// cannot be mapped and are dropped with a warning.
///
/// A row whose field count differs from the header's is malformed. It is kept under the empty
/// sample key, with its fields padded with nulls or truncated to the header width. Empty cells
/// become nulls.
///
/// # Errors
///
/// Returns [`PostrunError::MissingHeader`] if no header row is found, or
/// [`PostrunError::MissingKeyColumn`] if the header lacks the source's key column.
pub fn load<I>(source: SourceTag, rows: I) -> crate::errors::Result<SourceTable>
where
    I: IntoIterator<Item = RawRow>,
{
    let sentinel = source.header_sentinel();
    let mut header: Option<RawRow> = None;
    let mut data: Vec<RawRow> = Vec::new();
    let mut orphaned = 0usize;
    let mut repeated_headers = 0usize;

    for row in rows {
        let is_sentinel = sentinel.is_some_and(|s| row.first().is_some_and(|f| f == s));
        match (header.is_some(), sentinel.is_some()) {
            (false, false) => header = Some(row),
            (false, true) if is_sentinel => header = Some(row),
            (false, true) => orphaned += 1,
            (true, _) if is_sentinel => repeated_headers += 1,
            (true, _) => data.push(row),
        }
    }

    let header = header.ok_or_else(|| PostrunError::MissingHeader { report: source.to_string() })?;
    if orphaned > 0 {
        warn!("Dropped {orphaned} {source} row(s) that appeared before any header line");
    }
    if repeated_headers > 0 {
        debug!("Dropped {repeated_headers} repeated {source} header line(s)");
    }

    let selected = select_columns(source, &header);
    let key_index = selected
        .iter()
        .position(|&i| header[i] == source.key_column())
        .ok_or_else(|| PostrunError::MissingKeyColumn {
            report: source.to_string(),
            column: source.key_column().to_string(),
        })?;

    let mut mismatched = 0usize;
    let mut empty_keys = 0usize;
    let records: Vec<ReportRecord> = data
        .into_iter()
        .map(|row| {
            let malformed = row.len() != header.len();
            if malformed {
                mismatched += 1;
            }
            let values: Vec<Value> = selected
                .iter()
                .map(|&i| row.get(i).filter(|v| !v.is_empty()).cloned())
                .collect();
            let key = if malformed {
                SampleKey::default()
            } else {
                normalize(values[key_index].as_deref().unwrap_or(""), source)
            };
            if key.is_empty() && !malformed {
                empty_keys += 1;
            }
            ReportRecord::new(key, values)
        })
        .collect();

    if mismatched > 0 {
        warn!(
            "{mismatched} {source} row(s) did not have {} fields; they are kept under the empty sample identifier",
            header.len()
        );
    }
    if empty_keys > 0 {
        warn!("{empty_keys} {source} row(s) have an empty sample identifier");
    }

    let header: Vec<String> = selected.iter().map(|&i| header[i].clone()).collect();
    Ok(SourceTable::new(source, header, key_index, records))
}

/// Indices of the header columns kept for `source`, in header order.
fn select_columns(source: SourceTag, header: &[String]) -> Vec<usize> {
    let Some(wanted) = source.columns_of_interest() else {
        return (0..header.len()).collect();
    };
    for column in wanted {
        if !header.iter().any(|h| h == column) {
            warn!("The {source} report has no '{column}' column");
        }
    }
    (0..header.len()).filter(|&i| wanted.contains(&header[i].as_str())).collect()
}

/// Reads every line of a delimited file as a [`RawRow`].
///
/// Gzip-compressed files are detected by extension. Lines may have differing field counts.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid delimited UTF-8 text.
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<RawRow>> {
    let reader = Io::default()
        .new_reader(path)
        .with_context(|| format!("Failed to open report: {}", path.display()))?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .with_context(|| format!("Failed to parse report: {}", path.display()))
        })
        .collect()
}

/// Loads one source from one or more files, concatenating their rows in order.
///
/// # Errors
///
/// Returns an error if any file cannot be read or the combined rows do not form a valid
/// table for `source` (see [`load`]).
pub fn load_files<P: AsRef<Path>>(source: SourceTag, paths: &[P]) -> Result<SourceTable> {
    let mut rows = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file_rows = read_rows(path, source.delimiter())?;
        debug!("Read {} line(s) from {source} report {}", file_rows.len(), path.display());
        rows.extend(file_rows);
    }
    let table = load(source, rows)?;
    Ok(table)
}
