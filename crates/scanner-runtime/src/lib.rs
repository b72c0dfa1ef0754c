//! # NSG Scanner Runtime
//!
//! Wiring for the `scanner-runtime` binary.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, default `info`)
//! 2. Load [`RuntimeConfig`] from the environment
//! 3. Open the store and the node client
//! 4. Either broadcast `NSG_SUBMIT_RAW` and exit, or
//! 5. Register the logging observer and watch-list resolver, then run the
//!    scan loop until Ctrl+C

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod observer;
pub mod storage;

use std::sync::Arc;

use nsg_02_chain_store::ChainStateStore;
use nsg_03_tx_extraction::AddressBook;
use nsg_04_block_scanner::BlockScanner;
use nsg_types::ChainClient;

pub use config::{ConfigError, RuntimeConfig, StorageBackend};
pub use observer::LoggingObserver;
pub use storage::open_store;

/// Resolver over the configured watch list.
pub fn watch_list_resolver(config: &RuntimeConfig) -> AddressBook {
    AddressBook::from_pairs(
        config
            .watch
            .iter()
            .map(|(address, key)| (address.as_str(), key.as_str())),
    )
}

/// Build a scanner with the logging observer and watch-list resolver
/// attached.
pub fn build_scanner(
    config: &RuntimeConfig,
    client: Arc<dyn ChainClient>,
    store: Arc<ChainStateStore>,
    observer: Arc<LoggingObserver>,
) -> BlockScanner {
    let scanner = BlockScanner::new(config.scanner.clone(), client, store);
    scanner.add_observer(observer);
    scanner.set_resolver(Some(Arc::new(watch_list_resolver(config))));
    scanner
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use nsg_04_block_scanner::BlockScannerApi;
    use nsg_types::{MockChainClient, Transaction, TxType};

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_built_scanner_logs_watched_entries() {
        let config = RuntimeConfig::from_lookup(|key| match key {
            "NSG_SERVER_API" => Some("http://node".to_string()),
            "NSG_WATCH_ADDRESSES" => Some("NA=acct-a".to_string()),
            _ => None,
        })
        .unwrap();
        let client = Arc::new(MockChainClient::with_linked_chain(10));
        client.put_block_transactions(
            "block-9",
            vec![Transaction {
                id: "t1".into(),
                tx_type: TxType::Transfer,
                sender_id: "NX".into(),
                recipient_id: "NA".into(),
                amount: 100,
                ..Default::default()
            }],
        );
        let store = Arc::new(ChainStateStore::in_memory("NSG"));
        let observer = Arc::new(LoggingObserver::new());

        let scanner = build_scanner(&config, client, store, observer.clone());
        scanner.start();
        scanner.scan_block_task().await.unwrap();

        assert_eq!(observer.entries_seen(), 1);
    }
}
