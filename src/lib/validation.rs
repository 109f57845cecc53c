//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters and
//! file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`] to provide
//! rich contextual information when validation fails.

use crate::errors::{PostrunError, Result};
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Summary report")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use postrun_lib::validation::validate_file_exists;
/// use std::path::Path;
///
/// let result = validate_file_exists("/nonexistent/summary.csv", "Summary report");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(PostrunError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that the directory an output file will be written to exists
///
/// # Errors
/// Returns an error if the parent directory is missing
pub fn validate_output_dir<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(PostrunError::InvalidParameter {
                parameter: description.to_string(),
                reason: format!("Output directory does not exist: {}", parent.display()),
            })
        }
        _ => Ok(()),
    }
}
