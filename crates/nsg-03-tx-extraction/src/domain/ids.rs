//! # Derived Identifiers
//!
//! Ids depend only on `(txid, symbol, contract id, position)`, so extracting
//! the same transaction twice yields identical ids.

use sha2::{Digest, Sha256};

/// Side of a transfer record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// Debit.
    Input,
    /// Credit.
    Output,
}

impl RecordKind {
    fn tag(&self) -> &'static str {
        match self {
            RecordKind::Input => "input",
            RecordKind::Output => "output",
        }
    }
}

/// Id of a ledger entry.
pub fn entry_id(tx_id: &str, symbol: &str, contract_id: &str, index: u64) -> String {
    digest(&["entry", tx_id, symbol, contract_id, &index.to_string()])
}

/// Id of a transfer record.
pub fn record_id(kind: RecordKind, tx_id: &str, symbol: &str, contract_id: &str, index: u64) -> String {
    digest(&[kind.tag(), tx_id, symbol, contract_id, &index.to_string()])
}

fn digest(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"_");
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_deterministic() {
        assert_eq!(entry_id("t", "NSG", "", 0), entry_id("t", "NSG", "", 0));
        assert_eq!(
            record_id(RecordKind::Input, "t", "NSG", "c", 1),
            record_id(RecordKind::Input, "t", "NSG", "c", 1)
        );
    }

    #[test]
    fn test_ids_separate_every_component() {
        let base = entry_id("t", "NSG", "", 0);
        assert_ne!(base, entry_id("u", "NSG", "", 0));
        assert_ne!(base, entry_id("t", "NSG", "c", 0));
        assert_ne!(base, entry_id("t", "NSG", "", 1));
        assert_ne!(
            record_id(RecordKind::Input, "t", "NSG", "", 0),
            record_id(RecordKind::Output, "t", "NSG", "", 0)
        );
    }
}
