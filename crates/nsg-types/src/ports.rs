//! # Chain Client Port
//!
//! Outbound port to the ledger node. Implementations must fail explicitly
//! (timeout, connection error) rather than hang.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::entities::{AssetBalance, BlockHeader, Transaction};
use crate::errors::ChainClientError;

/// Ledger node RPC - outbound port.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current chain height reported by the node.
    async fn get_height(&self) -> Result<u64, ChainClientError>;

    /// Block header at `height`.
    async fn get_block_by_height(&self, height: u64) -> Result<BlockHeader, ChainClientError>;

    /// All transactions of block `block_id`.
    async fn get_transactions_by_block(
        &self,
        block_id: &str,
    ) -> Result<Vec<Transaction>, ChainClientError>;

    /// One transaction with its full asset payload.
    async fn get_transaction(&self, id: &str) -> Result<Transaction, ChainClientError>;

    /// Base currency balance of `address`, smallest unit.
    async fn get_balance(&self, address: &str) -> Result<u64, ChainClientError>;

    /// Asset balance of `address` in `currency`.
    async fn get_asset_balance(
        &self,
        address: &str,
        currency: &str,
    ) -> Result<AssetBalance, ChainClientError>;

    /// Broadcast a signed transaction (JSON), trying up to `retries` times.
    async fn broadcast(&self, signed_tx_json: &str, retries: u32) -> Result<(), ChainClientError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

#[derive(Default)]
struct MockChainState {
    blocks: BTreeMap<u64, BlockHeader>,
    block_txs: HashMap<String, Vec<Transaction>>,
    details: HashMap<String, Transaction>,
    balances: HashMap<String, u64>,
    asset_balances: HashMap<(String, String), AssetBalance>,
    failing_heights: HashSet<u64>,
    failing_blocks: HashSet<String>,
    failing_details: HashSet<String>,
    height_unavailable: bool,
    broadcasts: Vec<String>,
}

/// In-memory node for tests.
///
/// `get_height` reports the highest stored block. Failure toggles make
/// individual heights, block transaction lists or transaction details
/// unreachable.
#[derive(Default)]
pub struct MockChainClient {
    state: RwLock<MockChainState>,
}

impl MockChainClient {
    /// Empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node holding a linked chain of `count` blocks starting at height 1,
    /// with ids `block-{height}`.
    pub fn with_linked_chain(count: u64) -> Self {
        let client = Self::new();
        for height in 1..=count {
            client.put_block(linked_header(height, "block"));
        }
        client
    }

    /// Insert or replace a block.
    pub fn put_block(&self, header: BlockHeader) {
        self.state.write().blocks.insert(header.height, header);
    }

    /// Remove every block above `height`.
    pub fn truncate_above(&self, height: u64) {
        self.state.write().blocks.retain(|h, _| *h <= height);
    }

    /// Set the transactions of a block.
    pub fn put_block_transactions(&self, block_id: &str, txs: Vec<Transaction>) {
        self.state.write().block_txs.insert(block_id.to_string(), txs);
    }

    /// Set the detail view returned by `get_transaction`.
    pub fn put_transaction_detail(&self, tx: Transaction) {
        self.state.write().details.insert(tx.id.clone(), tx);
    }

    /// Set a base currency balance.
    pub fn set_balance(&self, address: &str, balance: u64) {
        self.state.write().balances.insert(address.to_string(), balance);
    }

    /// Set an asset balance.
    pub fn set_asset_balance(&self, address: &str, balance: AssetBalance) {
        self.state
            .write()
            .asset_balances
            .insert((address.to_string(), balance.currency.clone()), balance);
    }

    /// Make `get_block_by_height(height)` fail.
    pub fn fail_height(&self, height: u64) {
        self.state.write().failing_heights.insert(height);
    }

    /// Make `get_transactions_by_block(block_id)` fail.
    pub fn fail_block_transactions(&self, block_id: &str) {
        self.state.write().failing_blocks.insert(block_id.to_string());
    }

    /// Make `get_transaction(id)` fail.
    pub fn fail_transaction_detail(&self, id: &str) {
        self.state.write().failing_details.insert(id.to_string());
    }

    /// Make `get_height` fail.
    pub fn set_height_unavailable(&self, unavailable: bool) {
        self.state.write().height_unavailable = unavailable;
    }

    /// Clear every failure toggle.
    pub fn clear_failures(&self) {
        let mut state = self.state.write();
        state.failing_heights.clear();
        state.failing_blocks.clear();
        state.failing_details.clear();
        state.height_unavailable = false;
    }

    /// Payloads passed to `broadcast`.
    pub fn broadcasts(&self) -> Vec<String> {
        self.state.read().broadcasts.clone()
    }
}

/// Header at `height` linked to `{prefix}-{height - 1}`.
pub fn linked_header(height: u64, prefix: &str) -> BlockHeader {
    BlockHeader {
        id: format!("{}-{}", prefix, height),
        version: 0,
        timestamp: height as i64 * 10,
        height,
        previous_id: (height > 1).then(|| format!("{}-{}", prefix, height - 1)),
        number_of_transactions: 0,
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_height(&self) -> Result<u64, ChainClientError> {
        let state = self.state.read();
        if state.height_unavailable {
            return Err(ChainClientError::Connection("Mock failure".to_string()));
        }
        Ok(state.blocks.keys().next_back().copied().unwrap_or(0))
    }

    async fn get_block_by_height(&self, height: u64) -> Result<BlockHeader, ChainClientError> {
        let state = self.state.read();
        if state.failing_heights.contains(&height) {
            return Err(ChainClientError::Connection("Mock failure".to_string()));
        }
        state
            .blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| ChainClientError::NotFound(format!("block at height {}", height)))
    }

    async fn get_transactions_by_block(
        &self,
        block_id: &str,
    ) -> Result<Vec<Transaction>, ChainClientError> {
        let state = self.state.read();
        if state.failing_blocks.contains(block_id) {
            return Err(ChainClientError::Connection("Mock failure".to_string()));
        }
        Ok(state.block_txs.get(block_id).cloned().unwrap_or_default())
    }

    async fn get_transaction(&self, id: &str) -> Result<Transaction, ChainClientError> {
        let state = self.state.read();
        if state.failing_details.contains(id) {
            return Err(ChainClientError::Connection("Mock failure".to_string()));
        }
        if let Some(tx) = state.details.get(id) {
            return Ok(tx.clone());
        }
        state
            .block_txs
            .values()
            .flatten()
            .find(|tx| tx.id == id)
            .cloned()
            .ok_or_else(|| ChainClientError::NotFound(format!("transaction {}", id)))
    }

    async fn get_balance(&self, address: &str) -> Result<u64, ChainClientError> {
        Ok(self.state.read().balances.get(address).copied().unwrap_or(0))
    }

    async fn get_asset_balance(
        &self,
        address: &str,
        currency: &str,
    ) -> Result<AssetBalance, ChainClientError> {
        self.state
            .read()
            .asset_balances
            .get(&(address.to_string(), currency.to_string()))
            .cloned()
            .ok_or_else(|| ChainClientError::NotFound(format!("{} balance of {}", currency, address)))
    }

    async fn broadcast(&self, signed_tx_json: &str, _retries: u32) -> Result<(), ChainClientError> {
        self.state.write().broadcasts.push(signed_tx_json.to_string());
        Ok(())
    }
}
