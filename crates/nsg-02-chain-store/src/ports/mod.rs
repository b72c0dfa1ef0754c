//! # Ports Layer

pub mod outbound;

pub use outbound::{BatchOperation, KeyValueStore, ScanResult};
