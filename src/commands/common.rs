//! Common CLI options and input handling shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;
use log::info;

use postrun_lib::combine::SourceInput;
use postrun_lib::loader::load_files;
use postrun_lib::sample::SourceTag;

/// Options for writing merge metrics to a file.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Optional output TSV of per-source merge metrics
    #[arg(short = 'm', long = "metrics")]
    pub metrics: Option<PathBuf>,
}

/// The subset of `paths` that exist on disk. Missing paths are logged.
///
/// A report the pipeline did not produce is expected, so this is not an error.
pub fn existing_paths(source: SourceTag, paths: &[PathBuf]) -> Vec<&PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                info!("No {source} report found at {}", path.display());
            }
            exists
        })
        .collect()
}

/// Loads an optional source from whichever of `paths` exist.
///
/// Returns [`SourceInput::Absent`] if none exist and [`SourceInput::Unusable`] if the files
/// exist but cannot be loaded.
pub fn load_optional_source(source: SourceTag, paths: &[PathBuf]) -> SourceInput {
    let present = existing_paths(source, paths);
    if present.is_empty() {
        return SourceInput::Absent;
    }
    SourceInput::from_load(load_files(source, &present))
}
