//! # NSG-03 Transaction Extraction
//!
//! Classifies transactions into per-account ledger entries and drives that
//! classification across a block with bounded concurrency.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Extraction Rules
//!
//! | Case | Entries |
//! |------|---------|
//! | Unsupported type | none (successful-empty) |
//! | Asset payload missing or undecodable | none (successful-empty) |
//! | No address resolver | unsuccessful |
//! | Sender and recipient on the same account | one combined entry |
//! | Sender resolved | debit entry (+ separate fee entry for assets) |
//! | Recipient resolved | credit entry |
//!
//! ## Pipeline
//!
//! ```text
//!  transactions ──► [semaphore K] ──► unit tasks ──► unbounded mpsc ──► consumer
//!                                                                      │
//!                               observers ◄── success ─────────────────┤
//!                               UnscanSink ◄── failure ────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! nsg-03-tx-extraction/
//! ├── domain/          # ExtractResult, ledger entries, engine, derived ids, errors
//! ├── ports/           # AddressResolver, BlockScanObserver, UnscanSink (+ mocks)
//! ├── service/         # BatchExtractor pipeline, ObserverRegistry
//! └── config.rs        # PipelineConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::PipelineConfig;
pub use domain::{
    BlockContext, ExtractResult, ExtractionEngine, LedgerTransaction, LedgerTxType,
    ObserverError, PipelineError, SinkError, TransferRecord, TxExtractData,
};
pub use ports::{
    AddressBook, AddressResolver, BlockScanObserver, MemoryUnscanSink, RecordingObserver,
    UnscanSink,
};
pub use service::{BatchExtractor, BatchOutcome, ObserverRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
