//! # Domain Layer
//!
//! Ledger entries, the extraction engine and its errors.

pub mod engine;
pub mod entities;
pub mod errors;
pub mod ids;

pub use engine::ExtractionEngine;
pub use entities::{
    BlockContext, ExtractResult, LedgerTransaction, LedgerTxType, TransferRecord, TxExtractData,
};
pub use errors::{ObserverError, PipelineError, SinkError};
pub use ids::{entry_id, record_id, RecordKind};
