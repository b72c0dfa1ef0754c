//! # Error Types
//!
//! Errors shared by every crate that talks to the node.

use thiserror::Error;

/// Errors returned by a [`crate::ChainClient`].
///
/// Every variant is transient from the scanner's point of view: the height
/// being processed is retried on the next pass.
#[derive(Debug, Clone, Error)]
pub enum ChainClientError {
    /// The node could not be reached or the request timed out.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The node answered with an error body (`{status, code, error}`).
    #[error("Node error (status {status}, code {code}): {message}")]
    Node {
        /// HTTP status or node status text.
        status: String,
        /// Application error code.
        code: i64,
        /// Error text.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The requested block or transaction does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Broadcast was rejected on every attempt.
    #[error("Broadcast failed after {attempts} attempts: {message}")]
    BroadcastRejected {
        /// Attempts made.
        attempts: u32,
        /// Last error reported by the node.
        message: String,
    },
}

/// Errors from fixed-point amount handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount string was empty.
    #[error("Empty amount")]
    Empty,

    /// Amount string is not an unsigned integer.
    #[error("Amount is not an unsigned integer: {0}")]
    NotAnInteger(String),
}
