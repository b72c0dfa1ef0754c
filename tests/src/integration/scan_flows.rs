//! # Scan Flows
//!
//! The block scanner, extraction pipeline and chain state store working
//! together against a mock node.
//!
//! ## Flows Tested:
//!
//! 1. **First run**: cursor seeded from the remote head, head block extracted
//! 2. **Catch-up**: several blocks extracted in height order
//! 3. **Fork**: stale block reported, cursor rewound, chain rejoined
//! 4. **Rescan**: heights whose delivery failed are re-extracted later

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use nsg_02_chain_store::{ChainStateStore, ScanCursor};
    use nsg_03_tx_extraction::{AddressBook, LedgerTxType, RecordingObserver};
    use nsg_04_block_scanner::{BlockScanner, BlockScannerApi, ScannerConfig};
    use nsg_types::{
        linked_header, Asset, BlockHeader, MockChainClient, Transaction, TxType, UiaTransfer,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        client: Arc<MockChainClient>,
        store: Arc<ChainStateStore>,
        observer: Arc<RecordingObserver>,
        scanner: BlockScanner,
    }

    fn node(chain_length: u64) -> Node {
        let client = Arc::new(MockChainClient::with_linked_chain(chain_length));
        let store = Arc::new(ChainStateStore::in_memory("NSG"));
        let observer = Arc::new(RecordingObserver::new());
        let scanner = BlockScanner::new(ScannerConfig::for_testing(), client.clone(), store.clone());
        scanner.add_observer(observer.clone());
        scanner.set_resolver(Some(Arc::new(AddressBook::from_pairs([
            ("NA", "alice"),
            ("NB", "bob"),
        ]))));
        scanner.start();
        Node {
            client,
            store,
            observer,
            scanner,
        }
    }

    fn transfer(id: &str, from: &str, to: &str, amount: u64, fee: u64) -> Transaction {
        Transaction {
            id: id.into(),
            tx_type: TxType::Transfer,
            sender_id: from.into(),
            recipient_id: to.into(),
            amount,
            fee,
            ..Default::default()
        }
    }

    fn asset_transfer(id: &str, from: &str, to: &str, raw: &str, fee: u64) -> Transaction {
        Transaction {
            id: id.into(),
            tx_type: TxType::AssetTransfer,
            sender_id: from.into(),
            recipient_id: to.into(),
            fee,
            asset: Some(Asset {
                uia_transfer: Some(UiaTransfer {
                    transaction_id: id.into(),
                    currency: "ABC.COIN".into(),
                    amount: raw.into(),
                    precision: 2,
                }),
            }),
            ..Default::default()
        }
    }

    async fn wait_for_blocks(observer: &RecordingObserver, count: usize) {
        for _ in 0..200 {
            if observer.blocks().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {} block notifications", count);
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_first_run_extracts_head_block() {
        let n = node(50);
        n.client
            .put_block_transactions("block-49", vec![transfer("t1", "NX", "NA", 250_000_000, 0)]);

        let report = n.scanner.scan_block_task().await.unwrap();

        assert!(report.caught_up);
        assert_eq!(n.scanner.get_scanned_height().unwrap(), 49);
        let alice = n.observer.entries_for("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].transaction.amount, "2.5");
        assert_eq!(alice[0].outputs[0].address, "NA");
    }

    #[tokio::test]
    async fn test_catch_up_over_several_blocks() {
        let n = node(20);
        n.store.save_cursor(&ScanCursor::new(10, "block-10")).unwrap();
        n.client
            .put_block_transactions("block-12", vec![transfer("t12", "NA", "NB", 100_000, 0)]);
        n.client.put_block_transactions(
            "block-15",
            vec![asset_transfer("a15", "NB", "NX", "1234", 1_000_000)],
        );

        let report = n.scanner.scan_block_task().await.unwrap();

        assert_eq!(report.blocks_scanned, 9);
        assert_eq!(n.scanner.get_scanned_height().unwrap(), 19);

        // t12: alice debit, bob credit
        let alice = n.observer.entries_for("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].transaction.block_height, 12);
        assert_eq!(alice[0].transaction.amount, "0.001");

        // t12 credit, then a15 fee and asset debit
        let bob = n.observer.entries_for("bob");
        assert_eq!(bob.len(), 3);
        let fee = bob
            .iter()
            .find(|e| e.transaction.tx_type == LedgerTxType::FeeCharge)
            .unwrap();
        assert_eq!(fee.transaction.fees, "0.01");
        let debit = bob
            .iter()
            .find(|e| e.transaction.coin.is_contract)
            .unwrap();
        assert_eq!(debit.transaction.amount, "12.34");

        wait_for_blocks(&n.observer, 9).await;
        let mut heights: Vec<u64> = n.observer.blocks().iter().map(|(h, _)| h.height).collect();
        heights.sort();
        assert_eq!(heights, (11..=19).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_fork_recovery_rejoins_canonical_chain() {
        let n = node(30);
        n.store.save_cursor(&ScanCursor::new(20, "block-20")).unwrap();
        n.scanner.scan_block_task().await.unwrap();
        assert_eq!(n.scanner.get_scanned_height().unwrap(), 29);

        // replace 29 and extend
        n.client.truncate_above(28);
        for height in 29..=32 {
            let mut header = linked_header(height, "canon");
            if height == 29 {
                header.previous_id = Some("block-28".into());
            }
            n.client.put_block(header);
        }
        n.client
            .put_block_transactions("canon-30", vec![transfer("t30", "NX", "NB", 1, 0)]);

        let report = n.scanner.scan_block_task().await.unwrap();

        assert_eq!(report.forks, 1);
        assert!(report.caught_up);
        let cursor = n.store.get_cursor().unwrap().unwrap();
        assert_eq!(cursor, ScanCursor::new(31, "canon-31"));
        assert_eq!(n.store.get_block(29).unwrap().unwrap().id, "canon-29");
        assert_eq!(n.observer.entries_for("bob").len(), 1);

        for _ in 0..200 {
            if !n.observer.forks().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let forks: Vec<BlockHeader> = n.observer.forks();
        assert_eq!(forks.len(), 1);
        assert_eq!(forks[0].id, "block-29");
    }

    #[tokio::test]
    async fn test_failed_heights_rescanned_after_observer_recovers() {
        let n = node(10);
        n.store.save_cursor(&ScanCursor::new(5, "block-5")).unwrap();
        n.client
            .put_block_transactions("block-7", vec![transfer("t7", "NX", "NA", 1, 0)]);
        n.client
            .put_block_transactions("block-8", vec![transfer("t8", "NX", "NB", 1, 0)]);
        n.observer.set_reject_entries(true);

        let report = n.scanner.scan_block_task().await.unwrap();

        assert_eq!(report.blocks_with_failures, 2);
        assert_eq!(n.scanner.get_scanned_height().unwrap(), 9);
        let mut failed: Vec<u64> = n
            .store
            .get_unscan_records()
            .unwrap()
            .iter()
            .map(|r| r.block_height)
            .collect();
        failed.sort();
        assert_eq!(failed, vec![7, 8]);

        n.observer.set_reject_entries(false);
        let report = n.scanner.scan_block_task().await.unwrap();

        assert_eq!(report.rescanned, vec![7, 8]);
        assert!(n.store.get_unscan_records().unwrap().is_empty());
        assert_eq!(n.observer.entries_for("alice").len(), 1);
        assert_eq!(n.observer.entries_for("bob").len(), 1);
    }

    #[tokio::test]
    async fn test_reextraction_yields_identical_ids() {
        let n = node(10);
        n.client
            .put_block_transactions("block-4", vec![transfer("t4", "NA", "NB", 7, 3)]);

        n.scanner.scan_one_block(4).await.unwrap();
        n.scanner.scan_one_block(4).await.unwrap();

        let alice = n.observer.entries_for("alice");
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].transaction.wx_id, alice[1].transaction.wx_id);
        let sids = |i: usize| -> Vec<String> {
            alice[i].inputs.iter().map(|r| r.sid.clone()).collect()
        };
        assert_eq!(sids(0).len(), 2);
        assert_eq!(sids(0), sids(1));
    }

    #[tokio::test]
    async fn test_self_transfer_single_entry() {
        let n = node(10);
        n.client
            .put_block_transactions("block-3", vec![transfer("t3", "NA", "NA", 5, 1)]);

        n.scanner.scan_one_block(3).await.unwrap();

        let alice = n.observer.entries_for("alice");
        assert_eq!(alice.len(), 1);
        assert!(!alice[0].inputs.is_empty());
        assert!(!alice[0].outputs.is_empty());
    }
}
