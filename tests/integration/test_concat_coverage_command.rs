//! Integration tests for the concat-coverage command.

use tempfile::TempDir;

use crate::helpers::{
    CsvTable, arg, assert_cell, assert_success, run_postrun, write_coverage_report, write_summary,
};

#[test]
fn test_concat_coverage_reports() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let s1 = write_coverage_report(dir, "S1", "98.1", "30");
    let s2 = write_coverage_report(dir, "S2", "66.9", "12.5");
    let output = dir.join("coverage.csv");

    let result = run_postrun(&[
        "concat-coverage",
        "--input",
        arg(&s1),
        arg(&s2),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert_eq!(
        table.columns(),
        vec![
            "Sample",
            "rname",
            "startpos",
            "endpos",
            "numreads",
            "covbases",
            "coverage",
            "meandepth",
            "meanbaseq",
            "meanmapq"
        ]
    );
    assert_eq!(table.samples(), vec!["S1", "S2"]);
    assert_cell(&table, "S2", "meandepth", "12.5");
}

#[test]
fn test_concat_coverage_skips_unreadable_reports() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let s1 = write_coverage_report(dir, "S1", "98.1", "30");
    let output = dir.join("coverage.csv");

    let result = run_postrun(&[
        "concat-coverage",
        "--input",
        arg(&dir.join("S0.cov.txt")),
        arg(&s1),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    assert_eq!(CsvTable::read(&output).samples(), vec!["S1"]);
}

#[test]
fn test_concat_coverage_output_feeds_combine() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let s1 = write_coverage_report(dir, "S1", "98.1", "30");
    let coverage = dir.join("coverage.csv");
    assert_success(&run_postrun(&[
        "concat-coverage",
        "--input",
        arg(&s1),
        "--output",
        arg(&coverage),
    ]));

    let summary = write_summary(dir);
    let output = dir.join("postrun.csv");
    assert_success(&run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--coverage",
        arg(&coverage),
        "--output",
        arg(&output),
    ]));

    let table = CsvTable::read(&output);
    assert_cell(&table, "S1", "depth_after_trimming", "30");
    assert_cell(&table, "S2", "depth_after_trimming", "12.5");
    assert_cell(&table, "S2", "coverage_coverage", "");
}

#[test]
fn test_concat_coverage_no_readable_reports() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let empty = dir.join("S1.cov.txt");
    std::fs::write(&empty, "").unwrap();

    let result = run_postrun(&[
        "concat-coverage",
        "--input",
        arg(&empty),
        "--output",
        arg(&dir.join("coverage.csv")),
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("could be read"));
}
