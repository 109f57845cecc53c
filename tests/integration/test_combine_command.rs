//! Integration tests for the combine command.

use fgoxide::io::DelimFile;
use postrun_lib::metrics::MergeMetric;
use tempfile::TempDir;

use crate::helpers::{
    CsvTable, arg, assert_cell, assert_success, run_postrun, write_clade, write_coverage,
    write_coverage_report, write_lineage, write_lines, write_summary,
};

#[test]
fn test_combine_all_sources() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let coverage = write_coverage(dir);
    let lineage = write_lineage(dir);
    let clade = write_clade(dir);
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--coverage",
        arg(&coverage),
        "--lineage",
        arg(&lineage),
        "--clade",
        arg(&clade),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert_eq!(
        table.columns(),
        vec![
            "Sample",
            "num_input_reads",
            "depth_after_trimming",
            "1X_coverage_after_trimming",
            "coverage_coverage",
            "coverage_meandepth",
            "lineage_lineage",
            "lineage_conflict",
            "clade_qc.overallScore",
            "clade_qc.overallStatus",
        ]
    );
    assert_eq!(table.samples(), vec!["S1", "S2", "S3"]);

    // Fallback fills S1 and leaves the summary's own S2 depth alone
    assert_cell(&table, "S1", "depth_after_trimming", "30");
    assert_cell(&table, "S1", "1X_coverage_after_trimming", "98.1");
    assert_cell(&table, "S2", "depth_after_trimming", "12.5");
    assert_cell(&table, "S2", "1X_coverage_after_trimming", "70.2");

    assert_cell(&table, "S1", "lineage_lineage", "B.1.1.7");
    assert_cell(&table, "S2", "clade_qc.overallStatus", "good");
    assert_cell(&table, "S2", "lineage_lineage", "");

    // S3 is only in the lineage report
    assert_cell(&table, "S3", "lineage_lineage", "BA.2");
    assert_cell(&table, "S3", "num_input_reads", "");
    assert_cell(&table, "S3", "depth_after_trimming", "");
}

#[test]
fn test_combine_summary_only() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let expected = std::fs::read_to_string(&summary).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);
}

#[test]
fn test_combine_missing_optional_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let lineage = write_lineage(dir);
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--lineage",
        arg(&lineage),
        "--clade",
        arg(&dir.join("nextclade.csv")),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert!(table.columns().iter().all(|c| !c.starts_with("clade_")));
    assert!(table.columns().iter().all(|c| !c.starts_with("coverage_")));
    assert_cell(&table, "S1", "lineage_lineage", "B.1.1.7");
}

#[test]
fn test_combine_duplicate_lineage_rows_keep_last() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_lines(dir, "summary.csv", &["Sample,reads", "S1,10"]);
    let lineage = write_lines(
        dir,
        "lineage.csv",
        &["taxon,lineage", "S1 ref123.fasta,B.1", "S1 ref123.fasta,B.1.1.7"],
    );
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--lineage",
        arg(&lineage),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert_eq!(table.samples(), vec!["S1"]);
    assert_cell(&table, "S1", "lineage_lineage", "B.1.1.7");
}

#[test]
fn test_combine_multiple_lineage_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_lines(dir, "summary.csv", &["Sample,reads", "S1,10", "S2,20"]);
    let first = write_lines(dir, "S1.pangolin.csv", &["taxon,lineage", "S1 r,B.1"]);
    let second = write_lines(dir, "S2.pangolin.csv", &["taxon,lineage", "S2 r,BA.2"]);
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--lineage",
        arg(&first),
        arg(&second),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert_eq!(
        table.columns(),
        vec![
            "Sample",
            "reads",
            "depth_after_trimming",
            "1X_coverage_after_trimming",
            "lineage_lineage"
        ]
    );
    assert_cell(&table, "S1", "lineage_lineage", "B.1");
    assert_cell(&table, "S2", "lineage_lineage", "BA.2");
}

#[test]
fn test_combine_per_sample_coverage_reports() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_lines(dir, "summary.csv", &["Sample,reads", "S1,10", "S2,20"]);
    let s1 = write_coverage_report(dir, "S1", "98.1", "30");
    let s2 = write_coverage_report(dir, "S2", "66.9", "12.5");
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--coverage-reports",
        arg(&s1),
        arg(&s2),
        "--output",
        arg(&output),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert_cell(&table, "S1", "depth_after_trimming", "30");
    assert_cell(&table, "S2", "1X_coverage_after_trimming", "66.9");
    assert_cell(&table, "S2", "coverage_meandepth", "12.5");
    assert!(!table.columns().contains(&"coverage_Sample"));
}

#[test]
fn test_combine_unusable_clade_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let clade = write_lines(dir, "clade.csv", &["name;clade", "S1 r;20A"]);
    let output = dir.join("postrun.csv");
    let metrics = dir.join("merge_metrics.txt");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--clade",
        arg(&clade),
        "--output",
        arg(&output),
        "--metrics",
        arg(&metrics),
    ]);
    assert_success(&result);

    let table = CsvTable::read(&output);
    assert!(table.columns().iter().all(|c| !c.starts_with("clade_")));

    let rows: Vec<MergeMetric> = DelimFile::default().read_tsv(&metrics).unwrap();
    let statuses: Vec<(&str, &str)> =
        rows.iter().map(|m| (m.source.as_str(), m.status.as_str())).collect();
    assert_eq!(statuses, vec![("coverage", "absent"), ("lineage", "absent"), ("clade", "unusable")]);
}

#[test]
fn test_combine_writes_merge_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let coverage = write_coverage(dir);
    let lineage = write_lineage(dir);
    let output = dir.join("postrun.csv");
    let metrics = dir.join("merge_metrics.txt");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--coverage",
        arg(&coverage),
        "--lineage",
        arg(&lineage),
        "--output",
        arg(&output),
        "--metrics",
        arg(&metrics),
    ]);
    assert_success(&result);

    let rows: Vec<MergeMetric> = DelimFile::default().read_tsv(&metrics).unwrap();
    assert_eq!(rows.len(), 3);

    let coverage_metric = &rows[0];
    assert_eq!(coverage_metric.source, "coverage");
    assert_eq!(coverage_metric.status, "merged");
    assert_eq!(coverage_metric.matched, 2);
    // S1 depth and coverage, S2 coverage only
    assert_eq!(coverage_metric.fallback_filled, 3);
    assert_eq!((coverage_metric.unmatched, coverage_metric.columns_added), (0, 2));

    let lineage_metric = &rows[1];
    assert_eq!((lineage_metric.matched, lineage_metric.added), (1, 1));
    assert_eq!(lineage_metric.unmatched, 1);
}

#[test]
fn test_combine_with_outdir() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let summary = write_summary(dir);
    let output = dir.join("postrun.csv");

    let result = run_postrun(&[
        "combine",
        "--summary",
        arg(&summary),
        "--output",
        arg(&output),
        "--outdir",
        "s3://my-bucket/runs/run1",
    ]);
    assert_success(&result);

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("s3://my-bucket/runs/run1/multiqc/postrun.csv"), "stderr: {stderr}");
}
