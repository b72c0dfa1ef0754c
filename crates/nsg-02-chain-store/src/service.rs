//! # Chain State Store
//!
//! Typed access to the scan cursor, scanned block headers and unscan records
//! on top of any [`KeyValueStore`].

use nsg_types::{BlockHeader, UnscanRecord};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::adapters::InMemoryKVStore;
use crate::domain::{KeyLayout, ScanCursor, StoreError};
use crate::ports::{BatchOperation, KeyValueStore};

/// Durable local view of scan progress for one chain.
pub struct ChainStateStore {
    kv: RwLock<Box<dyn KeyValueStore>>,
    keys: KeyLayout,
}

impl ChainStateStore {
    /// Wrap a backend under the namespace of chain `symbol`.
    pub fn new(kv: Box<dyn KeyValueStore>, symbol: &str) -> Self {
        Self {
            kv: RwLock::new(kv),
            keys: KeyLayout::new(symbol),
        }
    }

    /// Store backed by memory only.
    pub fn in_memory(symbol: &str) -> Self {
        Self::new(Box::new(InMemoryKVStore::new()), symbol)
    }

    /// Key layout in use.
    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    /// Current cursor, `None` before the first run.
    pub fn get_cursor(&self) -> Result<Option<ScanCursor>, StoreError> {
        self.read_value("cursor", &self.keys.cursor())
    }

    /// Overwrite the cursor.
    pub fn save_cursor(&self, cursor: &ScanCursor) -> Result<(), StoreError> {
        let value = encode("cursor", cursor)?;
        self.kv.write().put(&self.keys.cursor(), &value)?;
        debug!(height = cursor.height, hash = %cursor.block_hash, "cursor saved");
        Ok(())
    }

    /// Persist a processed block and move the cursor onto it in one batch.
    pub fn save_scanned_block(&self, block: &BlockHeader) -> Result<(), StoreError> {
        let cursor = ScanCursor::new(block.height, block.id.clone());
        let ops = vec![
            BatchOperation::put(self.keys.cursor(), encode("cursor", &cursor)?),
            BatchOperation::put(self.keys.block(block.height), encode("block", block)?),
        ];
        self.kv.write().atomic_batch_write(ops)?;
        debug!(height = block.height, hash = %block.id, "block saved");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Blocks
    // -------------------------------------------------------------------------

    /// Store a block header by height.
    pub fn save_block(&self, block: &BlockHeader) -> Result<(), StoreError> {
        let value = encode("block", block)?;
        self.kv.write().put(&self.keys.block(block.height), &value)?;
        Ok(())
    }

    /// Block header previously stored at `height`.
    pub fn get_block(&self, height: u64) -> Result<Option<BlockHeader>, StoreError> {
        self.read_value("block", &self.keys.block(height))
    }

    // -------------------------------------------------------------------------
    // Unscan records
    // -------------------------------------------------------------------------

    /// Insert or overwrite the record for `(height, tx_id)`.
    pub fn save_unscan_record(&self, record: &UnscanRecord) -> Result<(), StoreError> {
        let key = self.keys.unscan(record.block_height, &record.tx_id);
        let value = encode("unscan record", record)?;
        self.kv.write().put(&key, &value)?;
        debug!(
            height = record.block_height,
            txid = %record.tx_id,
            reason = %record.reason,
            "unscan record saved"
        );
        Ok(())
    }

    /// Every record, in height order.
    pub fn get_unscan_records(&self) -> Result<Vec<UnscanRecord>, StoreError> {
        self.scan_values("unscan record", &self.keys.unscan_prefix())
    }

    /// Records filed at `height`.
    pub fn get_unscan_records_at(&self, height: u64) -> Result<Vec<UnscanRecord>, StoreError> {
        self.scan_values("unscan record", &self.keys.unscan_height_prefix(height))
    }

    /// Delete every record at `height`; returns how many were removed.
    pub fn delete_unscan_records(&self, height: u64) -> Result<usize, StoreError> {
        let prefix = self.keys.unscan_height_prefix(height);
        let mut kv = self.kv.write();
        let ops: Vec<BatchOperation> = kv
            .prefix_scan(&prefix)?
            .into_iter()
            .map(|(key, _)| BatchOperation::delete(key))
            .collect();
        let removed = ops.len();
        if removed > 0 {
            kv.atomic_batch_write(ops)?;
            debug!(height, removed, "unscan records deleted");
        }
        Ok(removed)
    }

    fn read_value<T: DeserializeOwned>(
        &self,
        what: &'static str,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        match self.kv.read().get(key)? {
            Some(bytes) => decode(what, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn scan_values<T: DeserializeOwned>(
        &self,
        what: &'static str,
        prefix: &[u8],
    ) -> Result<Vec<T>, StoreError> {
        self.kv
            .read()
            .prefix_scan(prefix)?
            .iter()
            .map(|(_, value)| decode(what, value))
            .collect()
    }
}

fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Encode {
        what,
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Corrupted {
        what,
        message: e.to_string(),
    })
}
