//! # Domain Layer
//!
//! Canonical transaction bytes, key material and signer errors.

pub mod canonical;
pub mod errors;
pub mod keys;

pub use canonical::{canonical_bytes, transaction_hash, transaction_id};
pub use errors::SignerError;
pub use keys::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
