//! Observer that writes scan results to the log.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use nsg_03_tx_extraction::{BlockScanObserver, ObserverError, TxExtractData};
use nsg_types::BlockHeader;
use tracing::info;

/// Logs every block and ledger entry.
#[derive(Default)]
pub struct LoggingObserver {
    blocks: AtomicU64,
    entries: AtomicU64,
}

impl LoggingObserver {
    /// New observer with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks seen.
    pub fn blocks_seen(&self) -> u64 {
        self.blocks.load(Ordering::Relaxed)
    }

    /// Entries seen.
    pub fn entries_seen(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlockScanObserver for LoggingObserver {
    async fn block_scan_notify(
        &self,
        header: &BlockHeader,
        is_fork: bool,
    ) -> Result<(), ObserverError> {
        self.blocks.fetch_add(1, Ordering::Relaxed);
        if is_fork {
            info!(height = header.height, hash = %header.id, "block dropped by fork");
        } else {
            info!(height = header.height, hash = %header.id, "block scanned");
        }
        Ok(())
    }

    async fn block_extract_data_notify(
        &self,
        account_key: &str,
        data: &TxExtractData,
    ) -> Result<(), ObserverError> {
        self.entries.fetch_add(1, Ordering::Relaxed);
        let tx = &data.transaction;
        info!(
            account = %account_key,
            txid = %tx.tx_id,
            height = tx.block_height,
            from = %tx.from.join(","),
            to = %tx.to.join(","),
            amount = %tx.amount,
            fees = %tx.fees,
            "ledger entry"
        );
        Ok(())
    }
}
