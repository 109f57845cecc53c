//! Writers for the report files a pipeline run leaves behind, and a runner for the binary.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Header of the per-sample coverage tool report.
pub const COVERAGE_REPORT_HEADER: &str =
    "#rname\tstartpos\tendpos\tnumreads\tcovbases\tcoverage\tmeandepth\tmeanbaseq\tmeanmapq";

/// Writes `lines` joined by newlines to `dir/name` and returns the path.
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(&path, body).expect("Failed to write test report");
    path
}

/// Summary report for S1 and S2. S2 already has a depth value.
pub fn write_summary(dir: &Path) -> PathBuf {
    write_lines(
        dir,
        "summary.csv",
        &[
            "Sample,num_input_reads,depth_after_trimming,1X_coverage_after_trimming",
            "S1,1000,,",
            "S2,2000,12.5,",
        ],
    )
}

/// Combined coverage table for S1 and S2.
pub fn write_coverage(dir: &Path) -> PathBuf {
    write_lines(
        dir,
        "coverage.csv",
        &["Sample,coverage,meandepth,numreads", "S1,98.1,30,100", "S2,70.2,9.0,40"],
    )
}

/// Lineage report with labelled sample names; S3 is not in the summary.
pub fn write_lineage(dir: &Path) -> PathBuf {
    write_lines(
        dir,
        "lineage.csv",
        &["taxon,lineage,conflict", "S1 MN908947.3,B.1.1.7,0.0", "S3 MN908947.3,BA.2,"],
    )
}

/// Semicolon-delimited clade report for S2.
pub fn write_clade(dir: &Path) -> PathBuf {
    write_lines(
        dir,
        "clade.csv",
        &["seqName;clade;qc.overallScore;qc.overallStatus", "S2 MN908947.3;20A;10.5;good"],
    )
}

/// One coverage tool report for `sample`.
pub fn write_coverage_report(dir: &Path, sample: &str, coverage: &str, meandepth: &str) -> PathBuf {
    let row = format!("MN908947.3\t1\t29903\t100\t29000\t{coverage}\t{meandepth}\t35\t60");
    write_lines(dir, &format!("{sample}.cov.txt"), &[COVERAGE_REPORT_HEADER, row.as_str()])
}

/// Converts a path to the `&str` form passed on the command line.
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("Test paths are valid UTF-8")
}

/// Runs the postrun binary with `args`.
pub fn run_postrun(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_postrun"))
        .args(args)
        .output()
        .expect("Failed to run postrun")
}
