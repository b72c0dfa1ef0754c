//! # Observer Registry
//!
//! Fan-out of scan notifications to every registered observer.

use std::sync::Arc;

use nsg_types::BlockHeader;
use parking_lot::RwLock;
use tracing::{error, warn};

use crate::domain::{ExtractResult, ObserverError};
use crate::ports::BlockScanObserver;

/// Registered observers.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn BlockScanObserver>>>,
}

impl ObserverRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn add(&self, observer: Arc<dyn BlockScanObserver>) {
        self.observers.write().push(observer);
    }

    /// Unregister an observer (by identity).
    pub fn remove(&self, observer: &Arc<dyn BlockScanObserver>) {
        self.observers.write().retain(|o| !Arc::ptr_eq(o, observer));
    }

    /// Drop every observer.
    pub fn clear(&self) {
        self.observers.write().clear();
    }

    /// Number of observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn BlockScanObserver>> {
        self.observers.read().clone()
    }

    /// Deliver a block notification. Observer errors are logged only.
    pub async fn notify_block(&self, header: &BlockHeader, is_fork: bool) {
        for observer in self.snapshot() {
            if let Err(e) = observer.block_scan_notify(header, is_fork).await {
                warn!(height = header.height, is_fork, error = %e, "block notification rejected");
            }
        }
    }

    /// Deliver every entry of `result` to every observer.
    ///
    /// All deliveries are attempted; the first rejection is returned. On
    /// success returns the number of deliveries.
    pub async fn notify_extract_data(&self, result: &ExtractResult) -> Result<usize, ObserverError> {
        let mut delivered = 0;
        let mut first_error = None;

        for observer in self.snapshot() {
            for (account_key, entries) in &result.extract_data {
                for entry in entries {
                    match observer.block_extract_data_notify(account_key, entry).await {
                        Ok(()) => delivered += 1,
                        Err(e) => {
                            error!(
                                height = result.block_height,
                                txid = %result.tx_id,
                                account = %account_key,
                                error = %e,
                                "extract data notification rejected"
                            );
                            first_error.get_or_insert(e);
                        }
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }
}
