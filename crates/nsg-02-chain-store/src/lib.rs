//! # NSG-02 Chain Store
//!
//! Durable local view of scan progress.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (domain + ports + adapters)
//!
//! ## Persisted Layout
//!
//! One key namespace per chain symbol:
//!
//! | Key | Value |
//! |-----|-------|
//! | `{ns}:cursor` | [`ScanCursor`] |
//! | `{ns}:block:{height BE}` | `BlockHeader` |
//! | `{ns}:unscan:{height BE}:{txid}` | `UnscanRecord` |
//!
//! Heights are big-endian so prefix scans return records in height order.
//!
//! ## Module Structure
//!
//! ```text
//! nsg-02-chain-store/
//! ├── domain/          # ScanCursor, key layout, errors
//! ├── ports/           # KeyValueStore + BatchOperation
//! ├── adapters/        # InMemoryKVStore, RocksDbStore (feature "rocksdb")
//! └── service.rs       # ChainStateStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::{KVStoreError, ScanCursor, StoreError};
pub use ports::{BatchOperation, KeyValueStore, ScanResult};
pub use service::ChainStateStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
