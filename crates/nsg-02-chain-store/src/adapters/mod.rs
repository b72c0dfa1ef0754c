//! # Storage Adapters

pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;

pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};
