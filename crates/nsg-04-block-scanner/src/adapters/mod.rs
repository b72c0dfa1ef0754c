//! # Adapters Layer

pub mod unscan_sink;

pub use unscan_sink::StoreUnscanSink;
