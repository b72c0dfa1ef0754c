//! # Domain Errors

use std::fmt;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError {
        /// Backend message.
        message: String,
    },
    /// Data corruption in the store.
    CorruptionError {
        /// Backend message.
        message: String,
    },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

/// Chain store errors.
///
/// Every variant is fatal to the scan loop: the local view can no longer be
/// trusted.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure.
    #[error(transparent)]
    Backend(#[from] KVStoreError),

    /// A value could not be encoded.
    #[error("Failed to encode {what}: {message}")]
    Encode {
        /// Record kind.
        what: &'static str,
        /// Encoder message.
        message: String,
    },

    /// A stored value could not be decoded.
    #[error("Corrupted {what} record: {message}")]
    Corrupted {
        /// Record kind.
        what: &'static str,
        /// Decoder message.
        message: String,
    },
}
