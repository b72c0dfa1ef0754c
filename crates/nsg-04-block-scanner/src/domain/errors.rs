//! # Domain Errors

use nsg_02_chain_store::StoreError;
use nsg_03_tx_extraction::PipelineError;
use nsg_types::{AmountError, ChainClientError};
use thiserror::Error;

/// Block scanner errors.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// Local storage failed. Fatal to the scan loop.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The node could not serve a request.
    #[error("Chain client error: {0}")]
    Chain(#[from] ChainClientError),

    /// A block's extraction did not fully succeed.
    #[error("Extraction pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Rescans must start above genesis.
    #[error("Rescan height must be greater than 0, got {0}")]
    InvalidRescanHeight(u64),

    /// The remote chain is too short to derive a head block.
    #[error("Remote chain height {0} has no head block")]
    NoHeadBlock(u64),

    /// The node did not report which block holds a transaction.
    #[error("Transaction {0} has no block height")]
    MissingBlockHeight(String),

    /// A single transaction could not be classified.
    #[error("Extraction of {tx_id} failed: {reason}")]
    Extraction {
        /// Transaction id.
        tx_id: String,
        /// Failure reason.
        reason: String,
    },

    /// A node amount could not be decoded.
    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),
}

impl ScannerError {
    /// Whether the condition may clear on a later pass.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScannerError::Chain(_) | ScannerError::NoHeadBlock(_))
    }
}
