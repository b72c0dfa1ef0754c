//! # Signing Flows
//!
//! An unsigned transaction built by a wallet goes through hashing, signing,
//! verification and broadcast.

#[cfg(test)]
mod tests {
    use nsg_01_tx_signer::{
        decode_raw_transaction, submit_raw_transaction, transaction_hash, transaction_id,
        Ed25519KeyPair, SignerError, TransactionSigner,
    };
    use nsg_types::{MockChainClient, Transaction, TxType};

    fn unsigned(keypair: &Ed25519KeyPair) -> Transaction {
        Transaction {
            tx_type: TxType::Transfer,
            timestamp: 59_049_090,
            sender_id: "NSender".into(),
            recipient_id: "NDt9qnAHnFAuP8T9GbzQ2o8UaacQscAcU2".into(),
            amount: 123_456,
            fee: 1_000_000,
            message: "hello".into(),
            sender_public_key: keypair.public_key().to_hex(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sign_combine_submit() {
        let keypair = Ed25519KeyPair::from_seed([0x11; 32]);
        let signer = TransactionSigner::new();
        let tx = unsigned(&keypair);
        let empty_json = serde_json::to_string(&tx).unwrap();

        let hash = transaction_hash(&tx).unwrap();
        let signature = signer
            .sign_transaction_hash(&hash, &*keypair.to_seed())
            .unwrap();
        let combined = signer
            .verify_and_combine(
                &empty_json,
                &hash,
                signature.as_bytes(),
                keypair.public_key().as_bytes(),
            )
            .unwrap();

        // the id is the hash of the signed transaction
        assert_eq!(
            combined.transaction.id,
            transaction_id(&combined.transaction).unwrap()
        );
        assert_eq!(decode_raw_transaction(&combined.raw_hex).unwrap(), combined.transaction);

        let client = MockChainClient::new();
        let txid = submit_raw_transaction(&client, &combined.raw_hex, 3).await.unwrap();

        assert_eq!(txid, combined.transaction.id);
        let sent: Transaction = serde_json::from_str(&client.broadcasts()[0]).unwrap();
        assert_eq!(sent.signature, hex::encode(signature.as_bytes()));
    }

    #[tokio::test]
    async fn test_wrong_key_is_rejected_before_broadcast() {
        let keypair = Ed25519KeyPair::from_seed([0x11; 32]);
        let other = Ed25519KeyPair::from_seed([0x22; 32]);
        let signer = TransactionSigner::new();
        let tx = unsigned(&keypair);
        let hash = transaction_hash(&tx).unwrap();
        let signature = other.sign(&hash);

        let result = signer.verify_and_combine(
            &serde_json::to_string(&tx).unwrap(),
            &hash,
            signature.as_bytes(),
            keypair.public_key().as_bytes(),
        );

        assert!(matches!(result, Err(SignerError::VerificationError)));
    }
}
