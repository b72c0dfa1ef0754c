//! # Extraction Pipeline
//!
//! Drives the engine across every transaction of a block.
//!
//! - At most `max_extracting` units run at once; a permit is taken before
//!   each unit is spawned and released when it finishes.
//! - Units hand results to a single consumer over an unbounded channel, so
//!   producers never block on delivery.
//! - The consumer notifies observers on success and files an
//!   [`UnscanRecord`] through the sink on any failure.
//! - The wait for all results is bounded by the stall timeout; on expiry the
//!   outstanding units are aborted and the whole block is recorded.

use std::sync::Arc;

use nsg_types::{ChainClient, Transaction, UnscanRecord};
use parking_lot::RwLock;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::PipelineConfig;
use crate::domain::{BlockContext, ExtractResult, ExtractionEngine, PipelineError};
use crate::ports::{AddressResolver, UnscanSink};
use crate::service::observers::ObserverRegistry;

/// Tally of one `batch_extract` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Results consumed.
    pub processed: usize,
    /// Entry deliveries accepted by observers.
    pub entries_delivered: usize,
    /// Units whose extraction failed.
    pub extraction_failures: usize,
    /// Units whose entries an observer rejected.
    pub notification_failures: usize,
}

/// One extraction unit: optional asset detail fetch, then the engine.
#[derive(Clone)]
struct ExtractionUnit {
    engine: Arc<ExtractionEngine>,
    client: Arc<dyn ChainClient>,
    resolver: Option<Arc<dyn AddressResolver>>,
}

impl ExtractionUnit {
    async fn run(&self, block: &BlockContext, tx: Transaction) -> ExtractResult {
        let tx = if tx.is_asset_transfer() && tx.uia_transfer().is_none() {
            let tx_id = tx.id.clone();
            match self.hydrate(tx).await {
                Some(tx) => tx,
                None => return ExtractResult::empty(block, &tx_id),
            }
        } else {
            tx
        };
        self.engine.extract(block, &tx, self.resolver.as_deref())
    }

    /// Block listings omit the asset payload; fetch the detail view.
    async fn hydrate(&self, tx: Transaction) -> Option<Transaction> {
        match self.client.get_transaction(&tx.id).await {
            Ok(mut detail) => {
                if detail.id.is_empty() {
                    detail.id = tx.id;
                }
                Some(detail)
            }
            Err(e) => {
                debug!(txid = %tx.id, error = %e, "asset detail unavailable, skipping");
                None
            }
        }
    }
}

/// Bounded-concurrency extraction across a block.
pub struct BatchExtractor {
    config: PipelineConfig,
    engine: Arc<ExtractionEngine>,
    client: Arc<dyn ChainClient>,
    observers: Arc<ObserverRegistry>,
    sink: Arc<dyn UnscanSink>,
    resolver: RwLock<Option<Arc<dyn AddressResolver>>>,
}

impl BatchExtractor {
    /// Create a pipeline. No resolver is set; units fail until one is.
    pub fn new(
        config: PipelineConfig,
        client: Arc<dyn ChainClient>,
        observers: Arc<ObserverRegistry>,
        sink: Arc<dyn UnscanSink>,
    ) -> Self {
        let engine = Arc::new(ExtractionEngine::new(config.symbol.clone(), config.decimals));
        Self {
            config,
            engine,
            client,
            observers,
            sink,
            resolver: RwLock::new(None),
        }
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Observers notified by the consumer.
    pub fn observers(&self) -> &Arc<ObserverRegistry> {
        &self.observers
    }

    /// Replace the address resolver.
    pub fn set_resolver(&self, resolver: Option<Arc<dyn AddressResolver>>) {
        *self.resolver.write() = resolver;
    }

    /// Current address resolver.
    pub fn resolver(&self) -> Option<Arc<dyn AddressResolver>> {
        self.resolver.read().clone()
    }

    /// Extract one transaction without notifying anyone.
    pub async fn extract_one(
        &self,
        block: &BlockContext,
        tx: Transaction,
        resolver: Option<Arc<dyn AddressResolver>>,
    ) -> ExtractResult {
        let unit = ExtractionUnit {
            engine: self.engine.clone(),
            client: self.client.clone(),
            resolver,
        };
        unit.run(block, tx).await
    }

    /// Extract and deliver every transaction of `block`.
    ///
    /// Returns an error when any unit failed or the block stalled; every
    /// failure has already been recorded through the sink.
    pub async fn batch_extract(
        &self,
        block: &BlockContext,
        transactions: Vec<Transaction>,
    ) -> Result<BatchOutcome, PipelineError> {
        let expected = transactions.len();
        if expected == 0 {
            return Ok(BatchOutcome::default());
        }

        let unit = ExtractionUnit {
            engine: self.engine.clone(),
            client: self.client.clone(),
            resolver: self.resolver(),
        };
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let producer = tokio::spawn(produce(
            unit,
            block.clone(),
            transactions,
            self.config.max_extracting,
            sender,
        ));

        let timeout = self.config.stall_timeout();
        let mut outcome = BatchOutcome::default();
        let consumed = tokio::time::timeout(
            timeout,
            self.consume(block, expected, &mut receiver, &mut outcome),
        )
        .await;

        if consumed.is_err() || outcome.processed < expected {
            producer.abort();
            error!(
                height = block.height,
                received = outcome.processed,
                expected,
                "extraction pipeline stalled, block queued for rescan"
            );
            self.record(block.height, "", "extraction pipeline stalled");
            return Err(PipelineError::Stalled {
                height: block.height,
                received: outcome.processed,
                expected,
                timeout,
            });
        }

        if outcome.extraction_failures > 0 || outcome.notification_failures > 0 {
            return Err(PipelineError::Incomplete {
                height: block.height,
                extraction_failures: outcome.extraction_failures,
                notification_failures: outcome.notification_failures,
            });
        }

        info!(
            height = block.height,
            txs = expected,
            entries = outcome.entries_delivered,
            "block extracted"
        );
        Ok(outcome)
    }

    async fn consume(
        &self,
        block: &BlockContext,
        expected: usize,
        receiver: &mut mpsc::UnboundedReceiver<ExtractResult>,
        outcome: &mut BatchOutcome,
    ) {
        while outcome.processed < expected {
            let Some(result) = receiver.recv().await else {
                break;
            };
            outcome.processed += 1;

            if result.success {
                match self.observers.notify_extract_data(&result).await {
                    Ok(delivered) => outcome.entries_delivered += delivered,
                    Err(e) => {
                        outcome.notification_failures += 1;
                        self.record(block.height, &result.tx_id, &e.to_string());
                    }
                }
            } else {
                outcome.extraction_failures += 1;
                warn!(
                    height = block.height,
                    txid = %result.tx_id,
                    reason = %result.reason,
                    "transaction extraction failed"
                );
                self.record(block.height, &result.tx_id, &result.reason);
            }
        }
    }

    fn record(&self, height: u64, tx_id: &str, reason: &str) {
        let record = UnscanRecord::new(height, tx_id, reason, &self.config.symbol);
        if let Err(e) = self.sink.record_failure(record) {
            error!(height, txid = %tx_id, error = %e, "failed to save unscan record");
        }
    }
}

async fn produce(
    unit: ExtractionUnit,
    block: BlockContext,
    transactions: Vec<Transaction>,
    max_extracting: usize,
    sender: mpsc::UnboundedSender<ExtractResult>,
) {
    let permits = Arc::new(Semaphore::new(max_extracting.max(1)));
    let mut units = JoinSet::new();

    for tx in transactions {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let unit = unit.clone();
        let block = block.clone();
        let sender = sender.clone();
        units.spawn(async move {
            let result = unit.run(&block, tx).await;
            drop(permit);
            let _ = sender.send(result);
        });
    }

    while let Some(joined) = units.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                error!(height = block.height, error = %e, "extraction unit panicked");
                let _ = sender.send(ExtractResult::failed(
                    &block,
                    "",
                    format!("extraction unit panicked: {}", e),
                ));
            }
        }
    }
}
