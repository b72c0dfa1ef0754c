//! # Inbound Ports
//!
//! What the wallet layer can ask of the scanner.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use nsg_03_tx_extraction::{AddressResolver, TxExtractData};
use nsg_types::{Balance, BlockHeader, SmartContract, TokenBalance};

use crate::domain::{ScanReport, ScannerError};

/// Block scanner API - inbound port.
#[async_trait]
pub trait BlockScannerApi: Send + Sync {
    /// Run one pass: seed if needed, walk to the remote head, then rescan
    /// failed heights.
    async fn scan_block_task(&self) -> Result<ScanReport, ScannerError>;

    /// Extract one height without touching the cursor.
    async fn scan_one_block(&self, height: u64) -> Result<BlockHeader, ScannerError>;

    /// Height of the cursor, 0 before seeding.
    fn get_scanned_height(&self) -> Result<u64, ScannerError>;

    /// Move the cursor so the next pass extracts `height` first.
    async fn set_rescan_height(&self, height: u64) -> Result<(), ScannerError>;

    /// Base-currency balances.
    async fn get_balance_by_address(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Balance>, ScannerError>;

    /// Asset balances for `contract`.
    async fn get_token_balance_by_address(
        &self,
        contract: &SmartContract,
        addresses: &[String],
    ) -> Result<Vec<TokenBalance>, ScannerError>;

    /// Remote head block (the block below the remote height).
    async fn get_current_block_header(&self) -> Result<BlockHeader, ScannerError>;

    /// Classify one transaction by id with a caller-supplied resolver.
    async fn extract_transaction_data(
        &self,
        tx_id: &str,
        resolver: Arc<dyn AddressResolver>,
    ) -> Result<BTreeMap<String, Vec<TxExtractData>>, ScannerError>;
}
