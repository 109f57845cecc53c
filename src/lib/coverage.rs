//! Concatenating per-sample coverage reports.
//!
//! The coverage tool writes one tab-separated report per sample, named `<sample>.cov.txt`:
//!
//! ```text
//! #rname      startpos  endpos  numreads  covbases  coverage  meandepth  meanbaseq  meanmapq
//! MN908947.3  1         29903   112046    29781     99.592    363.11     35.9       60
//! ```
//!
//! [`concat_coverage_reports`] stacks these into a single table with a leading `Sample`
//! column, ready to be loaded as the coverage source.

use std::path::Path;

use anyhow::{Result, bail};
use log::{debug, info, warn};

use crate::loader::{RawRow, read_rows};

/// Name of the sample column inserted in front of the coverage columns.
pub const SAMPLE_COLUMN: &str = "Sample";

/// Sample name implied by a coverage report's file name: the text before the first `.`.
///
/// # Examples
/// ```
/// use postrun_lib::coverage::sample_from_path;
/// use std::path::Path;
///
/// assert_eq!(sample_from_path(Path::new("/runs/r1/S1.cov.txt")), "S1");
/// assert_eq!(sample_from_path(Path::new("S2")), "S2");
/// ```
#[must_use]
pub fn sample_from_path(path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

/// Reads one coverage report and returns its header and data rows.
fn read_report(path: &Path) -> Result<(RawRow, Vec<RawRow>)> {
    let mut rows = read_rows(path, b'\t')?.into_iter();
    let Some(mut header) = rows.next() else {
        bail!("coverage report {} is empty", path.display());
    };
    if let Some(first) = header.first_mut() {
        if let Some(stripped) = first.strip_prefix('#') {
            *first = stripped.to_string();
        }
    }
    Ok((header, rows.collect()))
}

/// Stacks per-sample coverage reports into one table.
///
/// The first row of the result is the header: `Sample` followed by the header of the first
/// readable report. Rows of later reports are aligned to it by column name. Reports that
/// cannot be read are logged and skipped. Returns `None` if no report could be read.
#[must_use]
pub fn concat_coverage_reports<P: AsRef<Path>>(paths: &[P]) -> Option<Vec<RawRow>> {
    let mut header: Option<RawRow> = None;
    let mut rows: Vec<RawRow> = Vec::new();
    let mut reports = 0usize;

    for path in paths {
        let path = path.as_ref();
        let (file_header, data) = match read_report(path) {
            Ok(report) => report,
            Err(e) => {
                warn!("Skipping coverage report {}: {e:#}", path.display());
                continue;
            }
        };
        let sample = sample_from_path(path);
        debug!("Read {} coverage row(s) for sample {sample}", data.len());

        let combined_header = header.get_or_insert_with(|| file_header.clone());
        let positions: Vec<Option<usize>> =
            combined_header.iter().map(|c| file_header.iter().position(|h| h == c)).collect();
        for row in data {
            let mut out = Vec::with_capacity(positions.len() + 1);
            out.push(sample.clone());
            out.extend(
                positions.iter().map(|p| p.and_then(|i| row.get(i).cloned()).unwrap_or_default()),
            );
            rows.push(out);
        }
        reports += 1;
    }

    let header = header?;
    info!("Combined {reports} coverage report(s) into {} row(s)", rows.len());

    let mut table = Vec::with_capacity(rows.len() + 1);
    table.push(std::iter::once(SAMPLE_COLUMN.to_string()).chain(header).collect());
    table.extend(rows);
    Some(table)
}
