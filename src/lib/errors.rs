//! Custom error types for postrun operations.

use thiserror::Error;

/// Result type alias for postrun operations
pub type Result<T> = std::result::Result<T, PostrunError>;

/// Error type for postrun operations
#[derive(Error, Debug)]
pub enum PostrunError {
    /// No summary table was supplied, so there is nothing to join against
    #[error("No summary report available: the summary table is required as the join base")]
    MissingSummary,

    /// A report is missing the column that identifies its samples
    #[error("The {report} report has no '{column}' column to join on")]
    MissingKeyColumn {
        /// Name of the report (e.g. "summary")
        report: String,
        /// The expected key column
        column: String,
    },

    /// A report with no header line
    #[error("The {report} report has no header line")]
    MissingHeader {
        /// Name of the report (e.g. "lineage")
        report: String,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "summary report", "coverage report")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// An output location that cannot be split into bucket and prefix
    #[error("Invalid publish location '{location}': {reason}")]
    InvalidPublishLocation {
        /// The location as given
        location: String,
        /// Explanation of the problem
        reason: String,
    },
}
