//! CLI command implementations for postrun.
//!
//! Each submodule implements a single subcommand.
//!
//! - [`combine`] - Combine the summary, coverage, lineage and clade reports into one table
//! - [`concat_coverage`] - Stack per-sample coverage reports into one table

#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod combine;
pub mod command;
pub mod common;
pub mod concat_coverage;
