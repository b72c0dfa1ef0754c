//! # Transaction Signer
//!
//! Signs transaction hashes and folds a verified signature back into the
//! unsigned transaction produced by the wallet layer.

use nsg_types::Transaction;
use tracing::{debug, warn};

use crate::domain::{transaction_id, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SignerError};
use crate::submit::encode_raw_transaction;

/// A verified, signed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedTransaction {
    /// Transaction with `signature` and `id` filled in.
    pub transaction: Transaction,
    /// Hex of the transaction JSON, as accepted by the submit path.
    pub raw_hex: String,
}

/// Stateless signer for the ledger's Ed25519 scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionSigner;

impl TransactionSigner {
    /// Create a signer.
    pub fn new() -> Self {
        Self
    }

    /// Sign a 32-byte transaction hash with a 32-byte private key seed.
    pub fn sign_transaction_hash(
        &self,
        hash: &[u8],
        private_key: &[u8],
    ) -> Result<Ed25519Signature, SignerError> {
        if hash.len() != 32 {
            return Err(SignerError::SignError(format!(
                "hash must be 32 bytes, got {}",
                hash.len()
            )));
        }
        let keypair = Ed25519KeyPair::from_slice(private_key)?;
        Ok(keypair.sign(hash))
    }

    /// Verify `signature` over `message_hash`, then attach it to the
    /// transaction in `empty_tx_json` and recompute the id.
    pub fn verify_and_combine(
        &self,
        empty_tx_json: &str,
        message_hash: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<CombinedTransaction, SignerError> {
        let mut transaction: Transaction = serde_json::from_str(empty_tx_json)
            .map_err(|e| SignerError::MalformedTransaction(e.to_string()))?;

        let public_key = Ed25519PublicKey::from_slice(public_key)?;
        let signature = Ed25519Signature::from_slice(signature)?;
        if let Err(e) = public_key.verify(message_hash, &signature) {
            warn!(public_key = %public_key.to_hex(), "transaction signature rejected");
            return Err(e);
        }

        transaction.signature = signature.to_hex();
        transaction.id = transaction_id(&transaction)?;
        let raw_hex = encode_raw_transaction(&transaction)?;

        debug!(txid = %transaction.id, "transaction signature combined");
        Ok(CombinedTransaction {
            transaction,
            raw_hex,
        })
    }
}
