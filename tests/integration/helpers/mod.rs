//! Helper utilities for integration tests.

pub mod assertions;
pub mod report_generator;

pub use assertions::*;
pub use report_generator::*;
