//! # NSG-01 Transaction Signer
//!
//! Deterministic transaction canonicalization, hashing and Ed25519 signing.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (domain + service)
//!
//! ## Canonical Layout
//!
//! The byte layout below is what the node hashes and verifies; it must be
//! reproduced bit-exact.
//!
//! | # | Field | Encoding |
//! |---|-------|----------|
//! | 1 | type | 1 byte |
//! | 2 | timestamp | u32 LE (truncated) |
//! | 3 | sender public key | raw bytes (hex-decoded) |
//! | 4 | recipient address | UTF-8 bytes |
//! | 5 | amount | u64 LE |
//! | 6 | message | UTF-8 bytes |
//! | 7 | asset payload | currency ++ amount string, asset transfers only |
//! | 8 | signature | raw bytes, only when included and present |
//!
//! `hash = SHA-256(bytes without signature)` is what gets signed;
//! `id = hex(SHA-256(bytes with signature))`.
//!
//! ## Module Structure
//!
//! ```text
//! nsg-01-tx-signer/
//! ├── domain/          # Canonical bytes, Ed25519 keys, errors
//! ├── signer.rs        # TransactionSigner (sign, verify-and-combine)
//! └── submit.rs        # Raw transaction submit through the chain client
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod signer;
pub mod submit;

pub use domain::{
    canonical_bytes, transaction_hash, transaction_id, Ed25519KeyPair, Ed25519PublicKey,
    Ed25519Signature, SignerError,
};
pub use signer::{CombinedTransaction, TransactionSigner};
pub use submit::{decode_raw_transaction, encode_raw_transaction, submit_raw_transaction};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
