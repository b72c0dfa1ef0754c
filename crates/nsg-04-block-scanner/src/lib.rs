//! # NSG-04 Block Scanner
//!
//! Keeps a durable cursor linked to the remote chain and feeds every new
//! block through the extraction pipeline.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Scan Loop
//!
//! ```text
//!  Idle ──► Seeding ──► Scanning ──┬──► ForkDetected ──► Scanning
//!                          ▲       └──► Extracting ────► Scanning
//!                          │
//!                     caught up ──► Rescanning ──► Idle
//! ```
//!
//! | Condition | Action |
//! |-----------|--------|
//! | No cursor | seed from the block below the remote head |
//! | `local >= remote - 1` | caught up, rescan failed heights |
//! | Next block links | extract, persist cursor + block, notify |
//! | Next block does not link | rewind to `max(1, h - 2)`, notify stale block |
//! | Node error | stop the pass, retry the same height next tick |
//! | Store error | abort the loop |
//!
//! ## Module Structure
//!
//! ```text
//! nsg-04-block-scanner/
//! ├── domain/          # ScanState, ScanReport, ScannerError
//! ├── ports/           # BlockScannerApi
//! ├── adapters/        # StoreUnscanSink
//! ├── service/         # BlockScanner
//! └── config.rs        # ScannerConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::StoreUnscanSink;
pub use config::ScannerConfig;
pub use domain::{fork_rewind_height, ScanReport, ScanState, ScannerError};
pub use ports::BlockScannerApi;
pub use service::BlockScanner;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
