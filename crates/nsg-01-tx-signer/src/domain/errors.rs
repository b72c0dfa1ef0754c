//! # Domain Errors

use nsg_types::ChainClientError;
use thiserror::Error;

/// Signer error types.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Only transfers (0) and asset transfers (14) can be hashed.
    #[error("Transaction type is not allowed: {0}")]
    UnsupportedTransactionType(u32),

    /// Asset transfer without `asset.uiaTransfer`.
    #[error("Asset transfer has no asset payload")]
    MissingAssetPayload,

    /// A hex field could not be decoded.
    #[error("Invalid hex in {field}: {message}")]
    InvalidHex {
        /// Field name.
        field: &'static str,
        /// Decoder message.
        message: String,
    },

    /// Public key bytes are not a valid Ed25519 point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Private key is not a 32-byte seed.
    #[error("Invalid private key length: {0}")]
    InvalidPrivateKey(usize),

    /// Signature is not 64 bytes.
    #[error("Invalid signature length: {0}")]
    InvalidSignatureLength(usize),

    /// Signature creation failed.
    #[error("ECC sign hash failed: {0}")]
    SignError(String),

    /// Signature did not verify.
    #[error("Signature verification failed")]
    VerificationError,

    /// Transaction JSON could not be parsed or produced.
    #[error("Invalid empty transaction data: {0}")]
    MalformedTransaction(String),

    /// Raw transaction carries no signature.
    #[error("Transaction is not signed")]
    MissingSignature,

    /// Node rejected or never received the transaction.
    #[error("Broadcast failed: {0}")]
    Broadcast(#[from] ChainClientError),
}
