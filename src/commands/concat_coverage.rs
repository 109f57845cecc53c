//! Stack per-sample coverage reports into a single table.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::info;
use postrun_lib::coverage::concat_coverage_reports;
use postrun_lib::logging::OperationTimer;
use postrun_lib::report::write_rows;
use postrun_lib::validation::validate_output_dir;

use super::command::Command;

/// Concatenates per-sample coverage reports into one CSV with a leading `Sample` column.
#[derive(Parser, Debug)]
#[command(
    name = "concat-coverage",
    author,
    version,
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m   \x1b[36mConcatenate per-sample coverage reports\x1b[0m",
    long_about = r#"
Concatenates the per-sample reports written by the coverage tool into a single comma-separated
table.

Each input is a tab-separated report named `<sample>.<anything>`, with a header line such as
`#rname startpos endpos numreads covbases coverage meandepth meanbaseq meanmapq`. The output has a
`Sample` column, taken from the text of each file name before the first `.`, followed by the
columns of the first readable report. Columns of later reports are matched by name.

Reports that cannot be read are skipped with a warning. The command fails only if none can be read.
The output can be passed to `combine --coverage`.
"#
)]
pub struct ConcatCoverage {
    /// Per-sample coverage reports (TSV)
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Output CSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl Command for ConcatCoverage {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("ConcatCoverage");
        info!("  Command line: {command_line}");
        info!("  Inputs: {} report(s)", self.input.len());
        info!("  Output: {}", self.output.display());

        validate_output_dir(&self.output, "output")?;

        let timer = OperationTimer::new("Concatenating coverage reports");
        let Some(rows) = concat_coverage_reports(&self.input) else {
            bail!("None of the {} coverage report(s) could be read", self.input.len());
        };
        write_rows(&self.output, &rows)?;

        timer.log_completion(rows.len().saturating_sub(1) as u64);
        Ok(())
    }
}
