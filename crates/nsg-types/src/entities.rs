//! # Ledger Entities
//!
//! Wire shapes of the node's JSON API plus the small wallet-facing records
//! built on top of them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// =============================================================================
// Blocks
// =============================================================================

/// Block header as served by `/api/blocks/get`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Block hash.
    pub id: String,
    /// Block version.
    #[serde(default)]
    pub version: u32,
    /// Block time in seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Height; increases by one along the canonical chain.
    pub height: u64,
    /// Hash of the predecessor. `None` only at genesis.
    #[serde(rename = "previousBlock", default)]
    pub previous_id: Option<String>,
    /// Transaction count reported by the node.
    #[serde(default)]
    pub number_of_transactions: u32,
}

impl BlockHeader {
    /// Predecessor hash, empty at genesis.
    pub fn previous_hash(&self) -> &str {
        self.previous_id.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// Transaction types known to the ledger.
///
/// Only [`TxType::Transfer`] and [`TxType::AssetTransfer`] are hashed, signed
/// or extracted by this workspace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum TxType {
    /// Base currency transfer (0).
    #[default]
    Transfer,
    /// Second secret registration (1).
    SetSecureCode,
    /// Delegate registration (2).
    Delegate,
    /// Vote (3).
    Vote,
    /// Multi-signature registration (4).
    MultiSig,
    /// DApp publication (5).
    PublishDapp,
    /// DApp deposit (6).
    DepositDapp,
    /// DApp withdrawal (7).
    WithdrawalDapp,
    /// Asset publisher registration (9).
    RegPublisher,
    /// Asset registration (10).
    RegAsset,
    /// Asset issuance (13).
    IssueAsset,
    /// Asset transfer (14).
    AssetTransfer,
    /// Any other code.
    Other(u32),
}

impl TxType {
    /// Numeric type code.
    pub fn code(&self) -> u32 {
        match self {
            TxType::Transfer => 0,
            TxType::SetSecureCode => 1,
            TxType::Delegate => 2,
            TxType::Vote => 3,
            TxType::MultiSig => 4,
            TxType::PublishDapp => 5,
            TxType::DepositDapp => 6,
            TxType::WithdrawalDapp => 7,
            TxType::RegPublisher => 9,
            TxType::RegAsset => 10,
            TxType::IssueAsset => 13,
            TxType::AssetTransfer => 14,
            TxType::Other(code) => *code,
        }
    }

    /// Whether wallets can sign and extract this type.
    pub fn is_supported(&self) -> bool {
        matches!(self, TxType::Transfer | TxType::AssetTransfer)
    }
}

impl From<u32> for TxType {
    fn from(code: u32) -> Self {
        match code {
            0 => TxType::Transfer,
            1 => TxType::SetSecureCode,
            2 => TxType::Delegate,
            3 => TxType::Vote,
            4 => TxType::MultiSig,
            5 => TxType::PublishDapp,
            6 => TxType::DepositDapp,
            7 => TxType::WithdrawalDapp,
            9 => TxType::RegPublisher,
            10 => TxType::RegAsset,
            13 => TxType::IssueAsset,
            14 => TxType::AssetTransfer,
            other => TxType::Other(other),
        }
    }
}

impl From<TxType> for u32 {
    fn from(tx_type: TxType) -> Self {
        tx_type.code()
    }
}

/// Asset transfer payload (`asset.uiaTransfer`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiaTransfer {
    /// Owning transaction, when the node echoes it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transaction_id: String,
    /// Asset currency, e.g. `PUBLISHER.TOKEN`.
    pub currency: String,
    /// Integer amount in the asset's smallest unit.
    pub amount: String,
    /// Asset decimal exponent.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub precision: u8,
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// Type-specific transaction payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Present on asset transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uia_transfer: Option<UiaTransfer>,
}

/// Transaction as served by the node and as broadcast by wallets.
///
/// Field order matches the node's JSON; optional node fields are omitted when
/// empty so a re-serialized transaction stays byte-compatible with what the
/// broadcast endpoint expects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id (hex SHA-256 of the signed canonical bytes).
    #[serde(default)]
    pub id: String,
    /// Height of the containing block, as a decimal string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub height: String,
    /// Containing block.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_id: String,
    /// Transaction type.
    #[serde(rename = "type")]
    pub tx_type: TxType,
    /// Ledger timestamp (seconds since the NSG epoch).
    #[serde(default)]
    pub timestamp: i64,
    /// Sender address.
    #[serde(default)]
    pub sender_id: String,
    /// Recipient address.
    #[serde(default)]
    pub recipient_id: String,
    /// Amount in the base currency's smallest unit.
    #[serde(default)]
    pub amount: u64,
    /// Fee in the base currency's smallest unit.
    #[serde(default)]
    pub fee: u64,
    /// Hex signature.
    #[serde(default)]
    pub signature: String,
    /// Multi-signature set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<String>,
    /// Second signature.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sign_signature: String,
    /// Confirmation count.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub confirmations: String,
    /// Memo.
    #[serde(default)]
    pub message: String,
    /// Type-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Hex Ed25519 public key of the sender.
    #[serde(default)]
    pub sender_public_key: String,
}

impl Transaction {
    /// Asset transfer payload, if any.
    pub fn uia_transfer(&self) -> Option<&UiaTransfer> {
        self.asset.as_ref().and_then(|a| a.uia_transfer.as_ref())
    }

    /// Whether this is an asset transfer.
    pub fn is_asset_transfer(&self) -> bool {
        self.tx_type == TxType::AssetTransfer
    }

    /// Containing block height, when the node reported one.
    pub fn block_height(&self) -> Option<u64> {
        self.height.parse().ok()
    }
}

// =============================================================================
// Failure Records
// =============================================================================

/// Marker of extraction or notification failure pending retry.
///
/// A blank `tx_id` covers the whole block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscanRecord {
    /// Height of the affected block.
    pub block_height: u64,
    /// Affected transaction, empty for the whole block.
    pub tx_id: String,
    /// Failure description.
    pub reason: String,
    /// Chain symbol.
    pub symbol: String,
}

impl UnscanRecord {
    /// Record for one transaction, or the whole block when `tx_id` is empty.
    pub fn new(block_height: u64, tx_id: &str, reason: &str, symbol: &str) -> Self {
        Self {
            block_height,
            tx_id: tx_id.to_string(),
            reason: reason.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Whether the record covers the whole block.
    pub fn is_whole_block(&self) -> bool {
        self.tx_id.is_empty()
    }
}

// =============================================================================
// Balances & Contracts
// =============================================================================

/// Asset balance as reported by `/api/uia/balances/{address}/{currency}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Asset currency.
    pub currency: String,
    /// Integer balance string in the asset's smallest unit.
    pub balance: String,
    /// Asset decimal exponent.
    #[serde(default)]
    pub precision: u8,
}

/// Base currency balance of one address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Address.
    pub address: String,
    /// Currency symbol.
    pub symbol: String,
    /// Total balance.
    pub balance: String,
    /// Confirmed part of the balance.
    pub confirm_balance: String,
    /// Unconfirmed part of the balance.
    pub unconfirm_balance: String,
}

/// Token balance of one address under one contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Contract the balance belongs to.
    pub contract: SmartContract,
    /// Balance record.
    pub balance: Balance,
}

/// An asset registered on the ledger, seen by the wallet as a token contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContract {
    /// Stable identifier derived from `(symbol, address)`.
    pub contract_id: String,
    /// Base chain symbol.
    pub symbol: String,
    /// Asset currency (the "contract address" on this ledger).
    pub address: String,
    /// Token display name.
    pub token: String,
    /// Asset decimal exponent.
    pub decimals: u32,
}

impl SmartContract {
    /// Describe the asset `currency` on chain `symbol`.
    pub fn new(symbol: &str, currency: &str, decimals: u32) -> Self {
        Self {
            contract_id: contract_id(symbol, currency),
            symbol: symbol.to_string(),
            address: currency.to_string(),
            token: currency.to_string(),
            decimals,
        }
    }
}

/// The currency a ledger record is denominated in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Base chain symbol.
    pub symbol: String,
    /// Whether the record is in an asset rather than the base currency.
    pub is_contract: bool,
    /// Asset contract id; empty for the base currency.
    pub contract_id: String,
    /// Asset details.
    pub contract: Option<SmartContract>,
}

impl Coin {
    /// Base currency coin.
    pub fn base(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }

    /// Asset coin.
    pub fn asset(contract: SmartContract) -> Self {
        Self {
            symbol: contract.symbol.clone(),
            is_contract: true,
            contract_id: contract.contract_id.clone(),
            contract: Some(contract),
        }
    }
}

/// Stable contract identifier: hex SHA-256 of `"{symbol}_{address}"`.
pub fn contract_id(symbol: &str, address: &str) -> String {
    let digest = Sha256::digest(format!("{}_{}", symbol, address).as_bytes());
    hex::encode(digest)
}
