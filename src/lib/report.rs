//! Writing delimited reports.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::Io;

use crate::loader::RawRow;
use crate::project::ProjectedTable;

/// Writes `table` as comma-separated text with a header row. Nulls are written as empty cells.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_table<W: Write>(writer: W, table: &ProjectedTable) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(table.header())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the combined report to `path` (gzipped if the name ends in `.gz`).
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_report(path: &Path, table: &ProjectedTable) -> Result<()> {
    let writer = Io::default()
        .new_writer(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    write_table(writer, table)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

/// Writes raw rows, the first being the header, as comma-separated text to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_rows(path: &Path, rows: &[RawRow]) -> Result<()> {
    let writer = Io::default()
        .new_writer(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        csv_writer
            .write_record(row)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
