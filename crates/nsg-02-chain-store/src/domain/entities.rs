//! # Store Entities

use serde::{Deserialize, Serialize};

/// Durable traversal watermark: last processed height and its block hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    /// Last processed height.
    pub height: u64,
    /// Hash of the block at `height`.
    pub block_hash: String,
}

impl ScanCursor {
    /// Create a cursor.
    pub fn new(height: u64, block_hash: impl Into<String>) -> Self {
        Self {
            height,
            block_hash: block_hash.into(),
        }
    }
}
