//! # Block Scanner Service
//!
//! Walks the remote chain one height at a time, keeping the local cursor
//! linked to it.
//!
//! - Seeds the cursor from the remote head on first run.
//! - Extracts each linked block and persists cursor and block together.
//! - Rewinds past a fork point when the next block does not link.
//! - Rescans heights with unscan records once caught up.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use nsg_02_chain_store::{ChainStateStore, ScanCursor};
use nsg_03_tx_extraction::{
    AddressResolver, BatchExtractor, BlockContext, BlockScanObserver, ObserverRegistry,
    TxExtractData,
};
use nsg_types::{
    format_units, scale_raw_amount, Balance, BlockHeader, ChainClient, SmartContract,
    TokenBalance, UnscanRecord,
};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::adapters::StoreUnscanSink;
use crate::config::ScannerConfig;
use crate::domain::{fork_rewind_height, ScanReport, ScanState, ScannerError};
use crate::ports::BlockScannerApi;

/// Block scan loop for one chain.
pub struct BlockScanner {
    /// Configuration.
    config: ScannerConfig,
    /// Remote node.
    client: Arc<dyn ChainClient>,
    /// Cursor, scanned blocks and unscan records.
    store: Arc<ChainStateStore>,
    /// Block and entry observers.
    observers: Arc<ObserverRegistry>,
    /// Per-block extraction.
    pipeline: BatchExtractor,
    /// Cleared to stop the loop at the next iteration.
    running: AtomicBool,
    state: RwLock<ScanState>,
}

impl BlockScanner {
    /// Create a scanner. It does nothing until [`BlockScanner::start`].
    pub fn new(
        config: ScannerConfig,
        client: Arc<dyn ChainClient>,
        store: Arc<ChainStateStore>,
    ) -> Self {
        let observers = Arc::new(ObserverRegistry::new());
        let sink = Arc::new(StoreUnscanSink::new(store.clone()));
        let pipeline = BatchExtractor::new(
            config.pipeline_config(),
            client.clone(),
            observers.clone(),
            sink,
        );
        Self {
            config,
            client,
            store,
            observers,
            pipeline,
            running: AtomicBool::new(false),
            state: RwLock::new(ScanState::Idle),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Register an observer.
    pub fn add_observer(&self, observer: Arc<dyn BlockScanObserver>) {
        self.observers.add(observer);
    }

    /// Unregister an observer.
    pub fn remove_observer(&self, observer: &Arc<dyn BlockScanObserver>) {
        self.observers.remove(observer);
    }

    /// Resolver used by block extraction.
    pub fn set_resolver(&self, resolver: Option<Arc<dyn AddressResolver>>) {
        self.pipeline.set_resolver(resolver);
    }

    /// Current loop state.
    pub fn state(&self) -> ScanState {
        *self.state.read()
    }

    /// Allow passes to run.
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Stop at the top of the next iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether passes are allowed to run.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: ScanState) {
        *self.state.write() = state;
    }

    /// Run a pass every scan period until `shutdown` turns true or the
    /// store fails.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), ScannerError> {
        self.start();
        let mut ticker = tokio::time::interval(self.config.scan_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(symbol = %self.config.symbol, period = ?self.config.scan_period(), "block scanner started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.is_running() {
                        break;
                    }
                    match self.pass_until_shutdown(&mut shutdown).await {
                        Ok(report) => debug!(
                            scanned = report.blocks_scanned,
                            forks = report.forks,
                            height = report.final_height,
                            "scan pass finished"
                        ),
                        Err(e) => {
                            error!(error = %e, "scan loop aborted");
                            self.stop();
                            self.set_state(ScanState::Stopped);
                            return Err(e);
                        }
                    }
                    if !self.is_running() {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.stop();
        self.set_state(ScanState::Stopped);
        info!("block scanner stopped");
        Ok(())
    }

    /// One pass, clearing the running flag as soon as `shutdown` turns true
    /// so the pass stops before its next block.
    async fn pass_until_shutdown(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<ScanReport, ScannerError> {
        let pass = self.scan_block_task();
        tokio::pin!(pass);
        let mut watching = true;

        loop {
            tokio::select! {
                result = &mut pass => return result,
                changed = shutdown.changed(), if watching => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown requested mid-pass");
                        self.stop();
                        watching = false;
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scan pass
    // -------------------------------------------------------------------------

    async fn scan_pass(&self, report: &mut ScanReport) -> Result<(), ScannerError> {
        let mut cursor = match self.store.get_cursor()? {
            Some(cursor) if cursor.height > 0 => cursor,
            _ => {
                self.set_state(ScanState::Seeding);
                match self.seed_cursor().await {
                    Ok(cursor) => cursor,
                    Err(e) if e.is_transient() => {
                        warn!(error = %e, "cannot seed scan cursor");
                        report.fetch_error = chain_error(e);
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
            }
        };
        report.final_height = cursor.height;

        loop {
            self.set_state(ScanState::Scanning);
            if !self.is_running() {
                report.stopped = true;
                return Ok(());
            }

            let remote_height = match self.client.get_height().await {
                Ok(height) => height,
                Err(e) => {
                    warn!(error = %e, "cannot get remote height");
                    report.fetch_error = Some(e);
                    return Ok(());
                }
            };
            debug!(local = cursor.height, remote = remote_height, "comparing heights");
            if cursor.height >= remote_height.saturating_sub(1) {
                info!(height = cursor.height, "block scanner has caught up");
                report.caught_up = true;
                return Ok(());
            }

            let height = cursor.height + 1;
            let block = match self.client.get_block_by_height(height).await {
                Ok(block) => block,
                Err(e) => {
                    warn!(height, error = %e, "cannot get block");
                    report.fetch_error = Some(e);
                    return Ok(());
                }
            };

            if block.previous_hash() != cursor.block_hash {
                self.set_state(ScanState::ForkDetected);
                cursor = match self.recover_fork(&cursor, &block).await {
                    Ok(cursor) => cursor,
                    Err(ScannerError::Chain(e)) => {
                        report.fetch_error = Some(e);
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                };
                report.forks += 1;
                report.final_height = cursor.height;
                continue;
            }

            self.set_state(ScanState::Extracting);
            let transactions = match self.client.get_transactions_by_block(&block.id).await {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!(height, error = %e, "cannot get block transactions");
                    report.fetch_error = Some(e);
                    return Ok(());
                }
            };

            info!(height, txs = transactions.len(), "scanning block");
            let context = BlockContext::new(block.height, block.id.clone(), block.timestamp);
            if let Err(e) = self.pipeline.batch_extract(&context, transactions).await {
                warn!(height, error = %e, "block extraction incomplete");
                report.blocks_with_failures += 1;
            }

            self.store.save_scanned_block(&block)?;
            cursor = ScanCursor::new(block.height, block.id.clone());
            report.blocks_scanned += 1;
            report.final_height = cursor.height;
            self.spawn_block_notify(block, false);
        }
    }

    /// Derive the first cursor so the pass starts at the remote head block.
    async fn seed_cursor(&self) -> Result<ScanCursor, ScannerError> {
        info!("no local cursor, seeding from remote head");
        let head = self.head_block().await?;
        let cursor = ScanCursor::new(head.height.saturating_sub(1), head.previous_hash());
        self.store.save_cursor(&cursor)?;
        info!(height = cursor.height, hash = %cursor.block_hash, "scan cursor seeded");
        Ok(cursor)
    }

    async fn head_block(&self) -> Result<BlockHeader, ScannerError> {
        let remote_height = self.client.get_height().await?;
        if remote_height < 2 {
            return Err(ScannerError::NoHeadBlock(remote_height));
        }
        Ok(self.client.get_block_by_height(remote_height - 1).await?)
    }

    /// Rewind the cursor when `block` does not link to `cursor`.
    async fn recover_fork(
        &self,
        cursor: &ScanCursor,
        block: &BlockHeader,
    ) -> Result<ScanCursor, ScannerError> {
        let stale_height = block.height.saturating_sub(1);
        warn!(
            height = block.height,
            local_hash = %cursor.block_hash,
            remote_previous = %block.previous_hash(),
            "block does not link, fork detected"
        );

        let stale = self.store.get_block(stale_height)?;
        let dropped = self.store.delete_unscan_records(stale_height)?;
        if dropped > 0 {
            debug!(height = stale_height, dropped, "dropped unscan records of stale block");
        }

        let rewound = fork_rewind_height(block.height);
        let hash = match self.store.get_block(rewound)? {
            Some(local) => local.id,
            None => self.client.get_block_by_height(rewound).await?.id,
        };
        let cursor = ScanCursor::new(rewound, hash);
        self.store.save_cursor(&cursor)?;
        info!(height = cursor.height, hash = %cursor.block_hash, "scan cursor rewound");

        if let Some(stale) = stale {
            self.spawn_block_notify(stale, true);
        }
        Ok(cursor)
    }

    fn spawn_block_notify(&self, header: BlockHeader, is_fork: bool) {
        let observers = self.observers.clone();
        tokio::spawn(async move {
            observers.notify_block(&header, is_fork).await;
        });
    }

    // -------------------------------------------------------------------------
    // Rescan
    // -------------------------------------------------------------------------

    /// Re-extract every height holding unscan records, deleting the records
    /// of each height that now extracts cleanly. Returns those heights.
    pub async fn rescan_failed(&self) -> Result<Vec<u64>, ScannerError> {
        let heights: BTreeSet<u64> = self
            .store
            .get_unscan_records()?
            .iter()
            .map(|record| record.block_height)
            .filter(|height| *height != 0)
            .collect();

        let mut recovered = Vec::new();
        for height in heights {
            info!(height, "rescanning failed height");
            let block = match self.client.get_block_by_height(height).await {
                Ok(block) => block,
                Err(e) => {
                    warn!(height, error = %e, "cannot get block for rescan");
                    continue;
                }
            };
            let transactions = match self.client.get_transactions_by_block(&block.id).await {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!(height, error = %e, "cannot get block transactions for rescan");
                    continue;
                }
            };

            let context = BlockContext::new(block.height, block.id.clone(), block.timestamp);
            if let Err(e) = self.pipeline.batch_extract(&context, transactions).await {
                warn!(height, error = %e, "rescan incomplete, keeping records");
                continue;
            }

            self.store.delete_unscan_records(height)?;
            recovered.push(height);
        }
        Ok(recovered)
    }

    fn record_unscanned(&self, height: u64, reason: &str) -> Result<(), ScannerError> {
        let record = UnscanRecord::new(height, "", reason, &self.config.symbol);
        self.store.save_unscan_record(&record)?;
        Ok(())
    }
}

fn chain_error(e: ScannerError) -> Option<nsg_types::ChainClientError> {
    match e {
        ScannerError::Chain(e) => Some(e),
        _ => None,
    }
}

#[async_trait]
impl BlockScannerApi for BlockScanner {
    async fn scan_block_task(&self) -> Result<ScanReport, ScannerError> {
        let mut report = ScanReport::default();
        let pass = self.scan_pass(&mut report).await;
        if let Err(e) = pass {
            self.set_state(ScanState::Idle);
            return Err(e);
        }

        if report.caught_up && self.config.rescan_failed {
            self.set_state(ScanState::Rescanning);
            let rescanned = self.rescan_failed().await;
            self.set_state(ScanState::Idle);
            report.rescanned = rescanned?;
        } else {
            self.set_state(ScanState::Idle);
        }
        Ok(report)
    }

    async fn scan_one_block(&self, height: u64) -> Result<BlockHeader, ScannerError> {
        let block = match self.client.get_block_by_height(height).await {
            Ok(block) => block,
            Err(e) => {
                warn!(height, error = %e, "cannot get block");
                self.record_unscanned(height, &e.to_string())?;
                return Err(e.into());
            }
        };
        let transactions = match self.client.get_transactions_by_block(&block.id).await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!(height, error = %e, "cannot get block transactions");
                self.record_unscanned(height, &e.to_string())?;
                return Err(e.into());
            }
        };

        let context = BlockContext::new(block.height, block.id.clone(), block.timestamp);
        if let Err(e) = self.pipeline.batch_extract(&context, transactions).await {
            warn!(height, error = %e, "block extraction incomplete");
        }
        self.spawn_block_notify(block.clone(), false);
        Ok(block)
    }

    fn get_scanned_height(&self) -> Result<u64, ScannerError> {
        Ok(self.store.get_cursor()?.map(|c| c.height).unwrap_or(0))
    }

    async fn set_rescan_height(&self, height: u64) -> Result<(), ScannerError> {
        if height == 0 {
            return Err(ScannerError::InvalidRescanHeight(height));
        }
        let previous = self.client.get_block_by_height(height - 1).await?;
        self.store
            .save_cursor(&ScanCursor::new(height - 1, previous.id))?;
        info!(height, "rescan height set");
        Ok(())
    }

    async fn get_balance_by_address(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Balance>, ScannerError> {
        let mut balances = Vec::with_capacity(addresses.len());
        for address in addresses {
            let raw = self.client.get_balance(address).await?;
            let value = format_units(u128::from(raw), self.config.decimals);
            balances.push(Balance {
                address: address.clone(),
                symbol: self.config.symbol.clone(),
                balance: value.clone(),
                confirm_balance: value,
                unconfirm_balance: "0".to_string(),
            });
        }
        Ok(balances)
    }

    async fn get_token_balance_by_address(
        &self,
        contract: &SmartContract,
        addresses: &[String],
    ) -> Result<Vec<TokenBalance>, ScannerError> {
        let mut balances = Vec::with_capacity(addresses.len());
        for address in addresses {
            let asset = self
                .client
                .get_asset_balance(address, &contract.address)
                .await?;
            let value = scale_raw_amount(&asset.balance, contract.decimals)?;
            balances.push(TokenBalance {
                contract: contract.clone(),
                balance: Balance {
                    address: address.clone(),
                    symbol: contract.symbol.clone(),
                    balance: value.clone(),
                    confirm_balance: value,
                    unconfirm_balance: "0".to_string(),
                },
            });
        }
        Ok(balances)
    }

    async fn get_current_block_header(&self) -> Result<BlockHeader, ScannerError> {
        self.head_block().await
    }

    async fn extract_transaction_data(
        &self,
        tx_id: &str,
        resolver: Arc<dyn AddressResolver>,
    ) -> Result<BTreeMap<String, Vec<TxExtractData>>, ScannerError> {
        let tx = self.client.get_transaction(tx_id).await?;
        let height = tx
            .block_height()
            .ok_or_else(|| ScannerError::MissingBlockHeight(tx_id.to_string()))?;
        let block = self.client.get_block_by_height(height).await?;

        let context = BlockContext::new(block.height, block.id, block.timestamp);
        let result = self.pipeline.extract_one(&context, tx, Some(resolver)).await;
        if !result.success {
            return Err(ScannerError::Extraction {
                tx_id: tx_id.to_string(),
                reason: result.reason,
            });
        }
        Ok(result.extract_data)
    }
}
