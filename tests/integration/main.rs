//! Integration tests for the postrun binary.
//!
//! These tests run the CLI end to end against report files written to temporary directories.

mod helpers;
mod test_combine_command;
mod test_concat_coverage_command;
