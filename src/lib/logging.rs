//! Logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly logging of counts, timings and the
//! outcome of a reconciliation run.

use std::time::{Duration, Instant};

use crate::combine::{MergeOutcome, Reconciliation, SkipReason};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use postrun_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use postrun_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Logs how each source fared and the shape of the combined table.
pub fn log_reconcile_summary(result: &Reconciliation) {
    log::info!("Reconciliation Summary:");
    log::info!("  Samples: {}", format_count(result.table.len() as u64));
    for outcome in &result.outcomes {
        match outcome {
            MergeOutcome::Merged(stats) => {
                log::info!(
                    "  {}: {} sample(s), {} matched, {} added, {} unmatched, {} fallback value(s) filled",
                    stats.source,
                    format_count(stats.records as u64),
                    format_count(stats.matched as u64),
                    format_count(stats.added as u64),
                    format_count(stats.unmatched as u64),
                    format_count(stats.fallback_filled as u64),
                );
                if stats.duplicates > 0 {
                    log::info!(
                        "  {}: {} duplicate row(s) discarded",
                        stats.source,
                        format_count(stats.duplicates as u64)
                    );
                }
            }
            MergeOutcome::Skipped { source, reason: SkipReason::Absent } => {
                log::info!("  {source}: not available, skipped");
            }
            MergeOutcome::Skipped { source, reason: SkipReason::Unusable(why) } => {
                log::info!("  {source}: skipped ({why})");
            }
        }
    }
}

/// Operation timing and summary helper.
///
/// # Examples
///
/// ```no_run
/// use postrun_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Combining reports");
///
/// // ... do work ...
///
/// timer.log_completion(96); // Log with item count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with the number of rows produced.
    pub fn log_completion(&self, rows: u64) {
        log::info!(
            "{} completed: {} row(s) in {}",
            self.operation,
            format_count(rows),
            format_duration(self.start_time.elapsed())
        );
    }
}
