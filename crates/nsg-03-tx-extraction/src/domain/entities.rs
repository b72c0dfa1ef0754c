//! # Extraction Entities

use std::collections::BTreeMap;

use nsg_types::Coin;
use serde::{Deserialize, Serialize};

/// Block a transaction is extracted in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Block height.
    pub height: u64,
    /// Block hash.
    pub hash: String,
    /// Block time in seconds.
    pub time: i64,
}

impl BlockContext {
    /// Create a context.
    pub fn new(height: u64, hash: impl Into<String>, time: i64) -> Self {
        Self {
            height,
            hash: hash.into(),
            time,
        }
    }
}

/// Kind of ledger record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerTxType {
    /// Value transfer.
    #[default]
    Transfer,
    /// Network fee charged in the base currency.
    FeeCharge,
}

impl LedgerTxType {
    /// Positional index used in derived ids.
    pub fn index(&self) -> u64 {
        match self {
            LedgerTxType::Transfer => 0,
            LedgerTxType::FeeCharge => 1,
        }
    }
}

/// Wallet-facing transaction record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    /// Deterministic entry id.
    pub wx_id: String,
    /// On-chain transaction id.
    pub tx_id: String,
    /// Denomination.
    pub coin: Coin,
    /// Containing block hash.
    pub block_hash: String,
    /// Containing block height.
    pub block_height: u64,
    /// Block time.
    pub confirm_time: i64,
    /// `address:amount` pairs on the debit side.
    pub from: Vec<String>,
    /// `address:amount` pairs on the credit side.
    pub to: Vec<String>,
    /// Decimal amount.
    pub amount: String,
    /// Decimal fee in the base currency.
    pub fees: String,
    /// Decimal exponent of `amount`.
    pub decimals: u32,
    /// `"1"` for confirmed records.
    pub status: String,
    /// Failure reason, empty when confirmed.
    pub reason: String,
    /// Record kind.
    pub tx_type: LedgerTxType,
    /// Whether `memo` carries the transaction message.
    pub is_memo: bool,
    /// Transaction message.
    pub memo: String,
}

/// One debit or credit of a ledger record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Deterministic record id.
    pub sid: String,
    /// On-chain transaction id.
    pub tx_id: String,
    /// Debited or credited address.
    pub address: String,
    /// Denomination.
    pub coin: Coin,
    /// Decimal amount.
    pub amount: String,
    /// Chain symbol.
    pub symbol: String,
    /// Containing block hash.
    pub block_hash: String,
    /// Containing block height.
    pub block_height: u64,
    /// Position within the record's inputs or outputs.
    pub index: u64,
    /// Extraction time (unix seconds).
    pub created_at: i64,
    /// Record kind.
    pub tx_type: LedgerTxType,
}

/// One derived ledger entry for one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxExtractData {
    /// Ledger record.
    pub transaction: LedgerTransaction,
    /// Debits.
    pub inputs: Vec<TransferRecord>,
    /// Credits.
    pub outputs: Vec<TransferRecord>,
}

/// Outcome of extracting one transaction.
///
/// Ephemeral: consumed by the pipeline and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractResult {
    /// Transaction id.
    pub tx_id: String,
    /// Block hash.
    pub block_hash: String,
    /// Block height.
    pub block_height: u64,
    /// Block time.
    pub block_time: i64,
    /// Whether extraction completed; empty results can be successful.
    pub success: bool,
    /// Failure description when unsuccessful.
    pub reason: String,
    /// Entries keyed by account key.
    pub extract_data: BTreeMap<String, Vec<TxExtractData>>,
}

impl ExtractResult {
    /// Successful result with no entries.
    pub fn empty(block: &BlockContext, tx_id: &str) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            block_hash: block.hash.clone(),
            block_height: block.height,
            block_time: block.time,
            success: true,
            ..Default::default()
        }
    }

    /// Unsuccessful result.
    pub fn failed(block: &BlockContext, tx_id: &str, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
            ..Self::empty(block, tx_id)
        }
    }

    /// Entries derived for `account_key`.
    pub fn entries_for(&self, account_key: &str) -> &[TxExtractData] {
        self.extract_data
            .get(account_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of entries across accounts.
    pub fn entry_count(&self) -> usize {
        self.extract_data.values().map(Vec::len).sum()
    }
}
