//! # Domain Errors

use std::time::Duration;
use thiserror::Error;

/// A downstream observer rejected a notification.
#[derive(Debug, Clone, Error)]
#[error("Observer rejected notification: {0}")]
pub struct ObserverError(pub String);

/// The unscan record sink could not persist a record.
#[derive(Debug, Clone, Error)]
#[error("Failed to record unscanned work: {0}")]
pub struct SinkError(pub String);

/// Block-level pipeline errors.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Not every result arrived before the stall timeout; the whole block
    /// was recorded for rescan.
    #[error("Pipeline stalled at height {height}: {received}/{expected} results after {timeout:?}")]
    Stalled {
        /// Block height.
        height: u64,
        /// Results processed.
        received: usize,
        /// Results expected.
        expected: usize,
        /// Stall timeout applied.
        timeout: Duration,
    },

    /// Some units failed; each failure was recorded for rescan.
    #[error(
        "Block {height} incomplete: {extraction_failures} extraction failures, \
         {notification_failures} notification failures"
    )]
    Incomplete {
        /// Block height.
        height: u64,
        /// Units whose extraction failed.
        extraction_failures: usize,
        /// Units whose entries an observer rejected.
        notification_failures: usize,
    },
}
