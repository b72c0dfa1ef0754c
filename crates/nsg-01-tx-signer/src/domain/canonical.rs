//! # Canonical Transaction Bytes
//!
//! Fixed-order serialization hashed for signing and for transaction ids.

use nsg_types::Transaction;
use sha2::{Digest, Sha256};

use super::errors::SignerError;

/// Deterministic byte form of `tx`.
///
/// The signature is appended last only when `include_signature` is set and
/// the transaction already carries one. Types other than transfer and asset
/// transfer are rejected.
pub fn canonical_bytes(tx: &Transaction, include_signature: bool) -> Result<Vec<u8>, SignerError> {
    if !tx.tx_type.is_supported() {
        return Err(SignerError::UnsupportedTransactionType(tx.tx_type.code()));
    }

    let asset = if tx.is_asset_transfer() {
        let uia = tx.uia_transfer().ok_or(SignerError::MissingAssetPayload)?;
        Some((uia.currency.as_bytes(), uia.amount.as_bytes()))
    } else {
        None
    };

    let public_key = decode_field("senderPublicKey", &tx.sender_public_key)?;

    let mut bytes = Vec::with_capacity(
        1 + 4 + public_key.len() + tx.recipient_id.len() + 8 + tx.message.len() + 64,
    );
    bytes.push(tx.tx_type.code() as u8);
    bytes.extend_from_slice(&(tx.timestamp as u32).to_le_bytes());
    bytes.extend_from_slice(&public_key);
    bytes.extend_from_slice(tx.recipient_id.as_bytes());
    bytes.extend_from_slice(&tx.amount.to_le_bytes());
    bytes.extend_from_slice(tx.message.as_bytes());
    if let Some((currency, amount)) = asset {
        bytes.extend_from_slice(currency);
        bytes.extend_from_slice(amount);
    }

    if include_signature && !tx.signature.is_empty() {
        bytes.extend_from_slice(&decode_field("signature", &tx.signature)?);
    }

    Ok(bytes)
}

/// SHA-256 of the unsigned canonical bytes. This is the message that gets signed.
pub fn transaction_hash(tx: &Transaction) -> Result<[u8; 32], SignerError> {
    let bytes = canonical_bytes(tx, false)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Transaction id: hex SHA-256 of the signed canonical bytes.
pub fn transaction_id(tx: &Transaction) -> Result<String, SignerError> {
    let bytes = canonical_bytes(tx, true)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, SignerError> {
    hex::decode(value).map_err(|e| SignerError::InvalidHex {
        field,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsg_types::{Asset, TxType, UiaTransfer};
    use proptest::prelude::*;

    const PUBLIC_KEY: &str = "d67925c8c7fda675b4bf8e3230d2fccafd9c32be6414059bc3aa4bbb87d88548";

    fn transfer() -> Transaction {
        Transaction {
            tx_type: TxType::Transfer,
            amount: 12_345_678,
            fee: 1_000_000,
            message: "hello boy".into(),
            recipient_id: "NDt9qnAHnFAuP8T9GbzQ2o8UaacQscAcU2".into(),
            timestamp: 58_982_624,
            sender_public_key: PUBLIC_KEY.into(),
            ..Default::default()
        }
    }

    fn asset_transfer() -> Transaction {
        Transaction {
            tx_type: TxType::AssetTransfer,
            recipient_id: "NB".into(),
            timestamp: 1,
            sender_public_key: PUBLIC_KEY.into(),
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

    #[test]
    fn test_known_transfer_hash() {
        // type 0, u32 LE timestamp, raw public key, recipient, u64 LE amount, message
        let mut expected = vec![0u8];
        expected.extend_from_slice(&58_982_624u32.to_le_bytes());
        expected.extend_from_slice(&hex::decode(PUBLIC_KEY).unwrap());
        expected.extend_from_slice(b"NDt9qnAHnFAuP8T9GbzQ2o8UaacQscAcU2");
        expected.extend_from_slice(&12_345_678u64.to_le_bytes());
        expected.extend_from_slice(b"hello boy");

        let hash = transaction_hash(&transfer()).unwrap();
        assert_eq!(hash, <[u8; 32]>::from(Sha256::digest(&expected)));
        assert_eq!(
            hex::encode(hash),
            "892513438768a4ccc287051de1d11bfc0b8a6d7f2ebd469ff20ed8f9e387718b"
        );
    }

    #[test]
    fn test_field_layout() {
        let tx = transfer();
        let bytes = canonical_bytes(&tx, false).unwrap();

        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..5], &58_982_624u32.to_le_bytes());
        assert_eq!(hex::encode(&bytes[5..37]), PUBLIC_KEY);
        let recipient_end = 37 + tx.recipient_id.len();
        assert_eq!(&bytes[37..recipient_end], tx.recipient_id.as_bytes());
        assert_eq!(
            &bytes[recipient_end..recipient_end + 8],
            &12_345_678u64.to_le_bytes()
        );
        assert_eq!(&bytes[recipient_end + 8..], b"hello boy");
    }

    #[test]
    fn test_asset_payload_appended_raw() {
        let bytes = canonical_bytes(&asset_transfer(), false).unwrap();
        assert_eq!(bytes[0], 14);
        assert!(bytes.ends_with(b"ABC.COIN1234"));
    }

    #[test]
    fn test_signature_only_when_requested() {
        let mut tx = transfer();
        tx.signature = hex::encode([9u8; 64]);

        let unsigned = canonical_bytes(&tx, false).unwrap();
        let signed = canonical_bytes(&tx, true).unwrap();
        assert_eq!(signed.len(), unsigned.len() + 64);
        assert!(signed.starts_with(&unsigned));
        assert_ne!(transaction_id(&tx).unwrap(), hex::encode(transaction_hash(&tx).unwrap()));
    }

    #[test]
    fn test_unsigned_id_equals_hash() {
        let tx = transfer();
        assert_eq!(
            transaction_id(&tx).unwrap(),
            hex::encode(transaction_hash(&tx).unwrap())
        );
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let mut tx = transfer();
        tx.tx_type = TxType::Vote;
        assert!(matches!(
            canonical_bytes(&tx, false),
            Err(SignerError::UnsupportedTransactionType(3))
        ));
    }

    #[test]
    fn test_asset_without_payload_rejected() {
        let mut tx = asset_transfer();
        tx.asset = None;
        assert!(matches!(
            transaction_hash(&tx),
            Err(SignerError::MissingAssetPayload)
        ));
    }

    #[test]
    fn test_bad_public_key_hex() {
        let mut tx = transfer();
        tx.sender_public_key = "not-hex".into();
        assert!(matches!(
            canonical_bytes(&tx, false),
            Err(SignerError::InvalidHex { field: "senderPublicKey", .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_timestamp_truncated_to_u32(ts in any::<i64>()) {
            let mut tx = transfer();
            tx.timestamp = ts;
            let bytes = canonical_bytes(&tx, false).unwrap();
            prop_assert_eq!(&bytes[1..5], &(ts as u32).to_le_bytes());
        }
    }
}
