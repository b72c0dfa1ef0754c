//! # Scanner Entities

use nsg_types::ChainClientError;
use serde::{Deserialize, Serialize};

/// Number of heights the cursor steps back past a fork point.
pub const FORK_REWIND_DEPTH: u64 = 2;

/// Lowest height the cursor is rewound to.
pub const MIN_REWIND_HEIGHT: u64 = 1;

/// Where the scan loop currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    /// Waiting for the next pass.
    #[default]
    Idle,
    /// Deriving the first cursor from the remote head.
    Seeding,
    /// Comparing heights and fetching the next block.
    Scanning,
    /// Rewinding after a hash mismatch.
    ForkDetected,
    /// Running the extraction pipeline on a block.
    Extracting,
    /// Rescanning heights with unscan records.
    Rescanning,
    /// The loop has been shut down.
    Stopped,
}

/// Height the cursor rewinds to when the block at `height` does not link.
pub fn fork_rewind_height(height: u64) -> u64 {
    height.saturating_sub(FORK_REWIND_DEPTH).max(MIN_REWIND_HEIGHT)
}

/// Outcome of one `scan_block_task` pass.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    /// Blocks extracted and persisted.
    pub blocks_scanned: u64,
    /// Forks recovered from.
    pub forks: u64,
    /// Blocks whose pipeline reported failures.
    pub blocks_with_failures: u64,
    /// Cursor height when the pass ended.
    pub final_height: u64,
    /// The pass reached the remote head.
    pub caught_up: bool,
    /// The running flag was cleared mid-pass.
    pub stopped: bool,
    /// Node error that ended the pass early.
    pub fetch_error: Option<ChainClientError>,
    /// Heights fully recovered by the rescan.
    pub rescanned: Vec<u64>,
}
