//! Reading and asserting on the CSV tables the binary writes.

#![allow(dead_code)]

use std::path::Path;
use std::process::Output;

/// A CSV file read back as strings.
#[derive(Debug)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Reads a comma-separated file with a header row.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
        let header = reader.headers().expect("Missing header").iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.expect("Invalid record").iter().map(String::from).collect())
            .collect();
        Self { header, rows }
    }

    /// The header as `&str`s, for comparison with literals.
    pub fn columns(&self) -> Vec<&str> {
        self.header.iter().map(String::as_str).collect()
    }

    /// Sample names (first column) in row order.
    pub fn samples(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r[0].as_str()).collect()
    }

    /// The cell for `sample` in `column`. An empty cell is `Some("")`.
    pub fn cell(&self, sample: &str, column: &str) -> Option<&str> {
        let index = self.header.iter().position(|h| h == column)?;
        let row = self.rows.iter().find(|r| r[0] == sample)?;
        row.get(index).map(String::as_str)
    }
}

/// Asserts that `sample` has `expected` in `column`.
///
/// # Panics
///
/// Panics if the sample or column is missing, or the value differs.
pub fn assert_cell(table: &CsvTable, sample: &str, column: &str, expected: &str) {
    let actual = table
        .cell(sample, column)
        .unwrap_or_else(|| panic!("No cell for sample {sample} in column {column}"));
    assert_eq!(actual, expected, "Unexpected value for sample {sample} in column {column}");
}

/// Asserts that the process exited successfully, printing its stderr if not.
///
/// # Panics
///
/// Panics if the process failed.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "postrun failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
