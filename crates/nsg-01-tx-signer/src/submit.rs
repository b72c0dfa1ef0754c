//! # Raw Transaction Submit
//!
//! Raw transactions travel between the wallet layer and this crate as the
//! hex of their JSON encoding.

use nsg_types::{ChainClient, Transaction};
use tracing::info;

use crate::domain::{transaction_id, SignerError};

/// Hex of the transaction's JSON.
pub fn encode_raw_transaction(tx: &Transaction) -> Result<String, SignerError> {
    let json = serde_json::to_vec(tx).map_err(|e| SignerError::MalformedTransaction(e.to_string()))?;
    Ok(hex::encode(json))
}

/// Inverse of [`encode_raw_transaction`].
pub fn decode_raw_transaction(raw_hex: &str) -> Result<Transaction, SignerError> {
    let json = hex::decode(raw_hex.trim()).map_err(|e| SignerError::InvalidHex {
        field: "rawHex",
        message: e.to_string(),
    })?;
    serde_json::from_slice(&json).map_err(|e| SignerError::MalformedTransaction(e.to_string()))
}

/// Broadcast a signed raw transaction and return its id.
pub async fn submit_raw_transaction(
    client: &dyn ChainClient,
    raw_hex: &str,
    retries: u32,
) -> Result<String, SignerError> {
    let mut tx = decode_raw_transaction(raw_hex)?;
    if tx.signature.is_empty() {
        return Err(SignerError::MissingSignature);
    }
    if tx.id.is_empty() {
        tx.id = transaction_id(&tx)?;
    }

    let json = serde_json::to_string(&tx).map_err(|e| SignerError::MalformedTransaction(e.to_string()))?;
    client.broadcast(&json, retries).await?;

    info!(txid = %tx.id, "transaction submitted");
    Ok(tx.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{transaction_hash, Ed25519KeyPair};
    use nsg_types::MockChainClient;

    fn signed_tx() -> Transaction {
        let keypair = Ed25519KeyPair::from_seed([3; 32]);
        let mut tx = Transaction {
            timestamp: 100,
            recipient_id: "NRecipient".into(),
            amount: 1,
            sender_public_key: keypair.public_key().to_hex(),
            ..Default::default()
        };
        let hash = transaction_hash(&tx).unwrap();
        tx.signature = keypair.sign(&hash).to_hex();
        tx
    }

    #[tokio::test]
    async fn test_submit_broadcasts_and_returns_id() {
        let client = MockChainClient::new();
        let tx = signed_tx();
        let raw = encode_raw_transaction(&tx).unwrap();

        let txid = submit_raw_transaction(&client, &raw, 3).await.unwrap();

        assert_eq!(txid, transaction_id(&tx).unwrap());
        let sent = client.broadcasts();
        assert_eq!(sent.len(), 1);
        let broadcast: Transaction = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(broadcast.id, txid);
    }

    #[test]
    fn test_submit_refuses_unsigned() {
        let client = MockChainClient::new();
        let mut tx = signed_tx();
        tx.signature.clear();
        let raw = encode_raw_transaction(&tx).unwrap();

        let result = tokio_test::block_on(submit_raw_transaction(&client, &raw, 1));
        assert!(matches!(result, Err(SignerError::MissingSignature)));
        assert!(client.broadcasts().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(matches!(
            decode_raw_transaction("xyz"),
            Err(SignerError::InvalidHex { .. })
        ));
    }
}
