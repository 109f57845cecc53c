//! Combine the reports of a pipeline run into a single per-sample table.

use std::path::PathBuf;
use std::slice;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use postrun_lib::combine::{ReportInputs, SourceInput, reconcile};
use postrun_lib::coverage::concat_coverage_reports;
use postrun_lib::loader::{load, load_files};
use postrun_lib::logging::{OperationTimer, log_reconcile_summary};
use postrun_lib::metrics::MergeMetric;
use postrun_lib::metrics::writer::write_metrics_auto;
use postrun_lib::publish::PublishLocation;
use postrun_lib::report::write_report;
use postrun_lib::sample::{OptionalSource, SourceTag};
use postrun_lib::validation::{validate_file_exists, validate_output_dir};

use super::command::Command;
use super::common::{MetricsOptions, existing_paths, load_optional_source};

/// Combines the summary, coverage, lineage and clade reports into one CSV.
#[derive(Parser, Debug)]
#[command(
    name = "combine",
    author,
    version,
    about = "\x1b[38;5;173m[REPORTING]\x1b[0m \x1b[36mCombine per-sample run reports into one table\x1b[0m",
    long_about = r#"
Combines the per-sample reports of a pipeline run into a single comma-separated table with one row
per sample.

The summary report is required and is the base of the table. The coverage, lineage and clade
reports are optional: each one that exists and can be read is outer-joined onto the table in that
order, so samples that appear in any report get a row. A report that is missing is skipped, and a
report that cannot be parsed is skipped with a warning.

Sample names are reconciled before joining. Lineage and clade reports label samples as
`<sample> <suffix>`; only the text before the first whitespace is used. When a sample appears more
than once in a report the last row wins.

Columns contributed by an optional report are prefixed with its name (`coverage_`, `lineage_`,
`clade_`). The summary's `depth_after_trimming` and `1X_coverage_after_trimming` columns are
filled from the coverage report's `meandepth` and `coverage` where the summary has no value.

## Coverage Input

The coverage report may be given either as a single table with `--coverage`, or as the
per-sample reports of the coverage tool with `--coverage-reports`, in which case the sample name
is taken from each file name (the text before the first `.`).

## Outputs

- **<output>**: the combined table
- **<metrics>** (optional): a TSV with one row per optional report describing its merge
"#
)]
pub struct Combine {
    /// Summary report (CSV)
    #[arg(short = 's', long = "summary")]
    pub summary: PathBuf,

    /// Combined coverage report (CSV with a Sample column)
    #[arg(short = 'c', long = "coverage", conflicts_with = "coverage_reports")]
    pub coverage: Option<PathBuf>,

    /// Per-sample coverage reports (TSV, one per sample)
    #[arg(short = 'C', long = "coverage-reports", num_args = 1..)]
    pub coverage_reports: Vec<PathBuf>,

    /// Lineage report(s) (CSV)
    #[arg(short = 'l', long = "lineage", num_args = 1..)]
    pub lineage: Vec<PathBuf>,

    /// Clade report(s) (semicolon-separated)
    #[arg(short = 'n', long = "clade", num_args = 1..)]
    pub clade: Vec<PathBuf>,

    /// Output CSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    #[command(flatten)]
    pub metrics: MetricsOptions,

    /// Run output location (e.g. s3://bucket/run); the publish key is derived from it
    #[arg(long = "outdir")]
    pub outdir: Option<String>,
}

impl Command for Combine {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("Combine");
        info!("  Command line: {command_line}");
        info!("  Summary: {}", self.summary.display());
        info!("  Output: {}", self.output.display());

        validate_file_exists(&self.summary, "Summary report")?;
        validate_output_dir(&self.output, "output")?;
        if let Some(metrics) = &self.metrics.metrics {
            validate_output_dir(metrics, "metrics")?;
        }
        let publish = self.outdir.as_deref().map(PublishLocation::parse).transpose()?;

        let timer = OperationTimer::new("Combining reports");

        let summary = load_files(SourceTag::Summary, slice::from_ref(&self.summary))
            .with_context(|| format!("Failed to load summary report: {}", self.summary.display()))?;

        let inputs = ReportInputs::new(summary)
            .with_source(OptionalSource::Coverage, self.coverage_input())
            .with_source(OptionalSource::Lineage, load_optional_source(SourceTag::Lineage, &self.lineage))
            .with_source(OptionalSource::Clade, load_optional_source(SourceTag::Clade, &self.clade));

        let result = reconcile(inputs)?;
        log_reconcile_summary(&result);

        let table = result.project();
        write_report(&self.output, &table)?;
        info!("Wrote {} column(s) to {}", table.header().len(), self.output.display());

        if let Some(path) = &self.metrics.metrics {
            let metrics: Vec<MergeMetric> = result.outcomes.iter().map(MergeMetric::from).collect();
            write_metrics_auto(path, &metrics)?;
            info!("Wrote merge metrics to {}", path.display());
        }

        if let Some(location) = publish {
            let file_name = self
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Report destination: {}", location.report_uri(&file_name));
        }

        timer.log_completion(table.len() as u64);
        Ok(())
    }
}

impl Combine {
    /// Loads the coverage source from whichever coverage option was given.
    fn coverage_input(&self) -> SourceInput {
        if let Some(path) = &self.coverage {
            return load_optional_source(SourceTag::Coverage, slice::from_ref(path));
        }
        let present = existing_paths(SourceTag::Coverage, &self.coverage_reports);
        if present.is_empty() {
            return SourceInput::Absent;
        }
        match concat_coverage_reports(&present) {
            Some(rows) => {
                SourceInput::from_load(load(SourceTag::Coverage, rows).map_err(anyhow::Error::from))
            }
            None => SourceInput::Unusable("no coverage report could be read".to_string()),
        }
    }
}
