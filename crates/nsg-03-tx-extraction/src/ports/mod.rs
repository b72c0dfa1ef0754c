//! # Ports Layer
//!
//! - `inbound`: capabilities supplied by the wallet layer (address resolution)
//! - `outbound`: where results go (observers, unscan sink)

pub mod inbound;
pub mod outbound;

pub use inbound::{AddressBook, AddressResolver};
pub use outbound::{BlockScanObserver, MemoryUnscanSink, RecordingObserver, UnscanSink};
