//! # Extraction Engine
//!
//! Pure classification of one transaction into per-account ledger entries.
//! Fetching the asset detail view happens in the pipeline; the engine only
//! reads what it is given.

use nsg_types::{format_units, scale_raw_amount, Coin, SmartContract, Transaction};
use tracing::debug;

use super::entities::{
    BlockContext, ExtractResult, LedgerTransaction, LedgerTxType, TransferRecord, TxExtractData,
};
use super::ids::{entry_id, record_id, RecordKind};
use crate::ports::AddressResolver;

const STATUS_CONFIRMED: &str = "1";

/// Which sides of a transfer an account sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Debit,
    Credit,
    Both,
}

impl Side {
    fn debits(&self) -> bool {
        matches!(self, Side::Debit | Side::Both)
    }

    fn credits(&self) -> bool {
        matches!(self, Side::Credit | Side::Both)
    }
}

/// Denomination and decimal amount of the transferred value.
struct Valuation {
    coin: Coin,
    amount: String,
    decimals: u32,
}

/// Classifies transactions for one chain.
#[derive(Clone, Debug)]
pub struct ExtractionEngine {
    symbol: String,
    decimals: u32,
}

impl ExtractionEngine {
    /// Engine for chain `symbol` whose base currency has `decimals` digits.
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Chain symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Derive the ledger entries `tx` produces for resolvable accounts.
    pub fn extract(
        &self,
        block: &BlockContext,
        tx: &Transaction,
        resolver: Option<&dyn AddressResolver>,
    ) -> ExtractResult {
        if !tx.tx_type.is_supported() {
            debug!(txid = %tx.id, tx_type = tx.tx_type.code(), "unsupported transaction type");
            return ExtractResult::empty(block, &tx.id);
        }

        let valuation = match self.valuation(tx) {
            Some(valuation) => valuation,
            None => {
                debug!(txid = %tx.id, "asset payload missing or undecodable");
                return ExtractResult::empty(block, &tx.id);
            }
        };

        let Some(resolver) = resolver else {
            return ExtractResult::failed(block, &tx.id, "address resolver is not configured");
        };

        let sender = resolver.resolve(&tx.sender_id);
        let recipient = resolver.resolve(&tx.recipient_id);

        let mut result = ExtractResult::empty(block, &tx.id);
        match (sender, recipient) {
            (Some(from), Some(to)) if from == to && !from.is_empty() => {
                self.push_entries(&mut result, from, tx, &valuation, Side::Both);
            }
            (from, to) => {
                if let Some(from) = from {
                    self.push_entries(&mut result, from, tx, &valuation, Side::Debit);
                }
                if let Some(to) = to {
                    self.push_entries(&mut result, to, tx, &valuation, Side::Credit);
                }
            }
        }
        result
    }

    fn valuation(&self, tx: &Transaction) -> Option<Valuation> {
        if !tx.is_asset_transfer() {
            return Some(Valuation {
                coin: Coin::base(&self.symbol),
                amount: format_units(tx.amount as u128, self.decimals),
                decimals: self.decimals,
            });
        }

        let uia = tx.uia_transfer()?;
        let decimals = uia.precision as u32;
        let amount = scale_raw_amount(&uia.amount, decimals).ok()?;
        let contract = SmartContract::new(&self.symbol, &uia.currency, decimals);
        Some(Valuation {
            coin: Coin::asset(contract),
            amount,
            decimals,
        })
    }

    fn push_entries(
        &self,
        result: &mut ExtractResult,
        account_key: String,
        tx: &Transaction,
        valuation: &Valuation,
        side: Side,
    ) {
        let mut entries = Vec::with_capacity(2);
        if tx.is_asset_transfer() && side.debits() && tx.fee > 0 {
            entries.push(self.asset_fee_entry(result, tx, &valuation.amount));
        }
        entries.push(self.transfer_entry(result, tx, valuation, side));

        result
            .extract_data
            .entry(account_key)
            .or_default()
            .extend(entries);
    }

    fn transfer_entry(
        &self,
        result: &ExtractResult,
        tx: &Transaction,
        valuation: &Valuation,
        side: Side,
    ) -> TxExtractData {
        let fees = if tx.is_asset_transfer() {
            "0".to_string()
        } else {
            format_units(tx.fee as u128, self.decimals)
        };
        let amount = valuation.amount.clone();

        let transaction = LedgerTransaction {
            wx_id: entry_id(
                &result.tx_id,
                &self.symbol,
                &valuation.coin.contract_id,
                LedgerTxType::Transfer.index(),
            ),
            tx_id: result.tx_id.clone(),
            coin: valuation.coin.clone(),
            block_hash: result.block_hash.clone(),
            block_height: result.block_height,
            confirm_time: result.block_time,
            from: vec![format!("{}:{}", tx.sender_id, amount)],
            to: vec![format!("{}:{}", tx.recipient_id, amount)],
            amount: amount.clone(),
            fees: fees.clone(),
            decimals: valuation.decimals,
            status: STATUS_CONFIRMED.to_string(),
            reason: String::new(),
            tx_type: LedgerTxType::Transfer,
            is_memo: true,
            memo: tx.message.clone(),
        };

        let mut data = TxExtractData {
            transaction,
            ..Default::default()
        };

        if side.debits() {
            data.inputs
                .push(self.record(&data.transaction, RecordKind::Input, &tx.sender_id, &amount, 0));
            if !tx.is_asset_transfer() && tx.fee > 0 {
                let mut fee_charge =
                    self.record(&data.transaction, RecordKind::Input, &tx.sender_id, &fees, 1);
                fee_charge.coin = Coin::base(&self.symbol);
                data.inputs.push(fee_charge);
            }
        }
        if side.credits() {
            data.outputs.push(self.record(
                &data.transaction,
                RecordKind::Output,
                &tx.recipient_id,
                &amount,
                0,
            ));
        }
        data
    }

    fn asset_fee_entry(&self, result: &ExtractResult, tx: &Transaction, amount: &str) -> TxExtractData {
        let fees = format_units(tx.fee as u128, self.decimals);
        let coin = Coin::base(&self.symbol);

        let transaction = LedgerTransaction {
            wx_id: entry_id(&result.tx_id, &self.symbol, "", LedgerTxType::FeeCharge.index()),
            tx_id: result.tx_id.clone(),
            coin,
            block_hash: result.block_hash.clone(),
            block_height: result.block_height,
            confirm_time: result.block_time,
            from: vec![format!("{}:{}", tx.sender_id, amount)],
            to: vec![format!("'':{}", amount)],
            amount: "0".to_string(),
            fees: fees.clone(),
            decimals: self.decimals,
            status: STATUS_CONFIRMED.to_string(),
            reason: String::new(),
            tx_type: LedgerTxType::FeeCharge,
            is_memo: false,
            memo: String::new(),
        };

        let mut fee_charge = self.record(&transaction, RecordKind::Input, &tx.sender_id, &fees, 1);
        fee_charge.tx_type = LedgerTxType::FeeCharge;

        TxExtractData {
            transaction,
            inputs: vec![fee_charge],
            outputs: Vec::new(),
        }
    }

    fn record(
        &self,
        transaction: &LedgerTransaction,
        kind: RecordKind,
        address: &str,
        amount: &str,
        index: u64,
    ) -> TransferRecord {
        TransferRecord {
            sid: record_id(
                kind,
                &transaction.tx_id,
                &self.symbol,
                &transaction.coin.contract_id,
                index,
            ),
            tx_id: transaction.tx_id.clone(),
            address: address.to_string(),
            coin: transaction.coin.clone(),
            amount: amount.to_string(),
            symbol: self.symbol.clone(),
            block_hash: transaction.block_hash.clone(),
            block_height: transaction.block_height,
            index,
            created_at: chrono::Utc::now().timestamp(),
            tx_type: transaction.tx_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AddressBook;
    use nsg_types::{Asset, TxType, UiaTransfer};

    fn engine() -> ExtractionEngine {
        ExtractionEngine::new("NSG", 8)
    }

    fn block() -> BlockContext {
        BlockContext::new(100, "block-100", 1_000)
    }

    fn transfer(from: &str, to: &str, amount: u64, fee: u64) -> Transaction {
        Transaction {
            id: "tx-1".into(),
            tx_type: TxType::Transfer,
            sender_id: from.into(),
            recipient_id: to.into(),
            amount,
            fee,
            message: "hi".into(),
            ..Default::default()
        }
    }

    fn asset_transfer(from: &str, to: &str, fee: u64) -> Transaction {
        Transaction {
            id: "tx-asset".into(),
            tx_type: TxType::AssetTransfer,
            sender_id: from.into(),
            recipient_id: to.into(),
            fee,
            asset: Some(Asset {
                uia_transfer: Some(UiaTransfer {
                    currency: "ABC.COIN".into(),
                    amount: "1234".into(),
                    precision: 2,
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }
    }

    fn book() -> AddressBook {
        AddressBook::from_pairs([("NA", "acct-a"), ("NA2", "acct-a"), ("NB", "acct-b")])
    }

    #[test]
    fn test_debit_only_for_resolved_sender() {
        let book = book();
        let result = engine().extract(&block(), &transfer("NA", "NX", 500_000, 0), Some(&book));

        assert!(result.success);
        assert_eq!(result.extract_data.len(), 1);
        let entries = result.entries_for("acct-a");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].transaction.amount, "0.005");
        assert_eq!(entries[0].inputs.len(), 1);
        assert_eq!(entries[0].inputs[0].amount, "0.005");
        assert!(entries[0].outputs.is_empty());
    }

    #[test]
    fn test_credit_only_for_resolved_recipient() {
        let book = book();
        let result = engine().extract(&block(), &transfer("NX", "NB", 100_000_000, 0), Some(&book));

        let entries = result.entries_for("acct-b");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].inputs.is_empty());
        assert_eq!(entries[0].outputs[0].amount, "1");
        assert_eq!(entries[0].outputs[0].address, "NB");
    }

    #[test]
    fn test_two_accounts_each_see_their_side() {
        let book = book();
        let result = engine().extract(&block(), &transfer("NA", "NB", 1, 0), Some(&book));

        assert_eq!(result.entry_count(), 2);
        assert_eq!(result.entries_for("acct-a")[0].inputs.len(), 1);
        assert!(result.entries_for("acct-a")[0].outputs.is_empty());
        assert_eq!(result.entries_for("acct-b")[0].outputs.len(), 1);
    }

    #[test]
    fn test_self_transfer_is_one_combined_entry() {
        let book = book();
        let result = engine().extract(&block(), &transfer("NA", "NA2", 42, 0), Some(&book));

        assert_eq!(result.entry_count(), 1);
        let entry = &result.entries_for("acct-a")[0];
        assert_eq!(entry.inputs.len(), 1);
        assert_eq!(entry.outputs.len(), 1);
    }

    #[test]
    fn test_base_fee_is_second_input() {
        let book = book();
        let result = engine().extract(&block(), &transfer("NA", "NX", 500_000, 10_000_000), Some(&book));

        let entry = &result.entries_for("acct-a")[0];
        assert_eq!(entry.transaction.fees, "0.1");
        assert_eq!(entry.inputs.len(), 2);
        assert_eq!(entry.inputs[1].amount, "0.1");
        assert_ne!(entry.inputs[0].sid, entry.inputs[1].sid);
    }

    #[test]
    fn test_asset_fee_is_separate_base_currency_entry() {
        let book = book();
        let result = engine().extract(&block(), &asset_transfer("NA", "NX", 1_000_000), Some(&book));

        let entries = result.entries_for("acct-a");
        assert_eq!(entries.len(), 2);

        let fee = &entries[0];
        assert_eq!(fee.transaction.tx_type, LedgerTxType::FeeCharge);
        assert_eq!(fee.transaction.fees, "0.01");
        assert_eq!(fee.transaction.amount, "0");
        assert!(!fee.transaction.coin.is_contract);
        assert_eq!(fee.inputs[0].amount, "0.01");

        let asset = &entries[1];
        assert_eq!(asset.transaction.tx_type, LedgerTxType::Transfer);
        assert!(asset.transaction.coin.is_contract);
        assert_eq!(asset.transaction.amount, "12.34");
        assert_eq!(asset.transaction.decimals, 2);
        assert_eq!(asset.inputs[0].amount, "12.34");
        assert_ne!(fee.transaction.wx_id, asset.transaction.wx_id);
    }

    #[test]
    fn test_asset_recipient_gets_no_fee_entry() {
        let book = book();
        let result = engine().extract(&block(), &asset_transfer("NX", "NB", 1_000_000), Some(&book));

        let entries = result.entries_for("acct-b");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outputs[0].amount, "12.34");
    }

    #[test]
    fn test_asset_without_payload_is_successful_empty() {
        let book = book();
        let mut tx = asset_transfer("NA", "NB", 1);
        tx.asset = None;
        let result = engine().extract(&block(), &tx, Some(&book));
        assert!(result.success);
        assert_eq!(result.entry_count(), 0);

        let mut tx = asset_transfer("NA", "NB", 1);
        if let Some(uia) = tx.asset.as_mut().and_then(|a| a.uia_transfer.as_mut()) {
            uia.amount = "1.5".into();
        }
        let result = engine().extract(&block(), &tx, Some(&book));
        assert!(result.success);
        assert_eq!(result.entry_count(), 0);
    }

    #[test]
    fn test_unsupported_type_is_successful_empty() {
        let book = book();
        let mut tx = transfer("NA", "NB", 1, 0);
        tx.tx_type = TxType::Vote;
        let result = engine().extract(&block(), &tx, Some(&book));
        assert!(result.success);
        assert_eq!(result.entry_count(), 0);
    }

    #[test]
    fn test_missing_resolver_fails_the_unit() {
        let result = engine().extract(&block(), &transfer("NA", "NB", 1, 0), None);
        assert!(!result.success);
        assert!(!result.reason.is_empty());
    }

    #[test]
    fn test_re_extraction_yields_identical_ids() {
        let book = book();
        let tx = asset_transfer("NA", "NB", 1_000_000);
        let first = engine().extract(&block(), &tx, Some(&book));
        let second = engine().extract(&block(), &tx, Some(&book));

        for key in ["acct-a", "acct-b"] {
            let a = first.entries_for(key);
            let b = second.entries_for(key);
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b) {
                assert_eq!(x.transaction.wx_id, y.transaction.wx_id);
                let sids = |d: &TxExtractData| {
                    d.inputs
                        .iter()
                        .chain(d.outputs.iter())
                        .map(|r| r.sid.clone())
                        .collect::<Vec<_>>()
                };
                assert_eq!(sids(x), sids(y));
            }
        }
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |address: &str| (address == "NA").then(|| "acct-a".to_string());
        let result = engine().extract(&block(), &transfer("NA", "NB", 1, 0), Some(&resolver));
        assert_eq!(result.entry_count(), 1);
    }
}
