//! Unscan records filed by the pipeline land in the chain state store.

use std::sync::Arc;

use nsg_02_chain_store::ChainStateStore;
use nsg_03_tx_extraction::{SinkError, UnscanSink};
use nsg_types::UnscanRecord;

/// [`UnscanSink`] over a [`ChainStateStore`].
pub struct StoreUnscanSink {
    store: Arc<ChainStateStore>,
}

impl StoreUnscanSink {
    /// Sink writing into `store`.
    pub fn new(store: Arc<ChainStateStore>) -> Self {
        Self { store }
    }
}

impl UnscanSink for StoreUnscanSink {
    fn record_failure(&self, record: UnscanRecord) -> Result<(), SinkError> {
        self.store
            .save_unscan_record(&record)
            .map_err(|e| SinkError(e.to_string()))
    }
}
