//! # Outbound Ports
//!
//! Downstream consumers of scan results.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use nsg_types::{BlockHeader, UnscanRecord};
use parking_lot::RwLock;

use crate::domain::{ObserverError, SinkError, TxExtractData};

/// Receives block and ledger entry notifications.
#[async_trait]
pub trait BlockScanObserver: Send + Sync {
    /// A block was scanned, or a stale block was dropped by a fork.
    async fn block_scan_notify(&self, header: &BlockHeader, is_fork: bool)
        -> Result<(), ObserverError>;

    /// A ledger entry was derived for `account_key`.
    async fn block_extract_data_notify(
        &self,
        account_key: &str,
        data: &TxExtractData,
    ) -> Result<(), ObserverError>;
}

/// Persists failed work for a later rescan.
pub trait UnscanSink: Send + Sync {
    /// Record a failure.
    fn record_failure(&self, record: UnscanRecord) -> Result<(), SinkError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Observer that records every notification.
#[derive(Default)]
pub struct RecordingObserver {
    blocks: RwLock<Vec<(BlockHeader, bool)>>,
    entries: RwLock<Vec<(String, TxExtractData)>>,
    reject_entries: AtomicBool,
}

impl RecordingObserver {
    /// Observer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or accept again) entry notifications.
    pub fn set_reject_entries(&self, reject: bool) {
        self.reject_entries.store(reject, Ordering::SeqCst);
    }

    /// Block notifications received, with their fork flag.
    pub fn blocks(&self) -> Vec<(BlockHeader, bool)> {
        self.blocks.read().clone()
    }

    /// Fork notifications received.
    pub fn forks(&self) -> Vec<BlockHeader> {
        self.blocks
            .read()
            .iter()
            .filter(|(_, is_fork)| *is_fork)
            .map(|(header, _)| header.clone())
            .collect()
    }

    /// Accepted entries.
    pub fn entries(&self) -> Vec<(String, TxExtractData)> {
        self.entries.read().clone()
    }

    /// Accepted entries for one account.
    pub fn entries_for(&self, account_key: &str) -> Vec<TxExtractData> {
        self.entries
            .read()
            .iter()
            .filter(|(key, _)| key == account_key)
            .map(|(_, data)| data.clone())
            .collect()
    }
}

#[async_trait]
impl BlockScanObserver for RecordingObserver {
    async fn block_scan_notify(
        &self,
        header: &BlockHeader,
        is_fork: bool,
    ) -> Result<(), ObserverError> {
        self.blocks.write().push((header.clone(), is_fork));
        Ok(())
    }

    async fn block_extract_data_notify(
        &self,
        account_key: &str,
        data: &TxExtractData,
    ) -> Result<(), ObserverError> {
        if self.reject_entries.load(Ordering::SeqCst) {
            return Err(ObserverError("Mock rejection".to_string()));
        }
        self.entries
            .write()
            .push((account_key.to_string(), data.clone()));
        Ok(())
    }
}

/// Sink that keeps records in memory.
#[derive(Default)]
pub struct MemoryUnscanSink {
    records: RwLock<Vec<UnscanRecord>>,
}

impl MemoryUnscanSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far.
    pub fn records(&self) -> Vec<UnscanRecord> {
        self.records.read().clone()
    }
}

impl UnscanSink for MemoryUnscanSink {
    fn record_failure(&self, record: UnscanRecord) -> Result<(), SinkError> {
        self.records.write().push(record);
        Ok(())
    }
}
