//! Where a finished report is published.
//!
//! Pipeline runs write their results under an object-store location such as
//! `s3://bucket/runs/2024-01-01`. The combined report is published next to the run's other
//! QC reports, under `<prefix>multiqc/`. Uploading is left to the caller; this module only
//! derives the destination.

use std::fmt;

use crate::errors::{PostrunError, Result};

/// Sub-directory of the run prefix that holds QC reports.
pub const REPORT_DIR: &str = "multiqc/";

/// A bucket and key prefix parsed from a run's output location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishLocation {
    bucket: String,
    prefix: String,
}

impl PublishLocation {
    /// Parses `s3://bucket/some/prefix` (the scheme is optional).
    ///
    /// A non-empty prefix always ends with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`PostrunError::InvalidPublishLocation`] if no bucket name is present.
    ///
    /// # Examples
    /// ```
    /// use postrun_lib::publish::PublishLocation;
    ///
    /// let location = PublishLocation::parse("s3://my-bucket/runs/run1").unwrap();
    /// assert_eq!(location.bucket(), "my-bucket");
    /// assert_eq!(location.prefix(), "runs/run1/");
    /// assert_eq!(location.report_key("postrun.csv"), "runs/run1/multiqc/postrun.csv");
    /// ```
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        let path = trimmed.strip_prefix("s3://").unwrap_or(trimmed);
        let (bucket, prefix) = path.split_once('/').unwrap_or((path, ""));
        if bucket.is_empty() {
            return Err(PostrunError::InvalidPublishLocation {
                location: location.to_string(),
                reason: "missing bucket name".to_string(),
            });
        }

        let mut prefix = prefix.trim_start_matches('/').to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Ok(Self { bucket: bucket.to_string(), prefix })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Object key under which a report named `file_name` is published.
    #[must_use]
    pub fn report_key(&self, file_name: &str) -> String {
        format!("{}{REPORT_DIR}{file_name}", self.prefix)
    }

    /// Full `s3://` URI of a report named `file_name`.
    #[must_use]
    pub fn report_uri(&self, file_name: &str) -> String {
        format!("{self}{REPORT_DIR}{file_name}")
    }
}

impl fmt::Display for PublishLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}
