//! # Ed25519 Keys
//!
//! The ledger's only signature curve. Signatures are deterministic, so the
//! same hash and key always produce the same bytes.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use super::errors::SignerError;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from a byte slice, validating the point.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignerError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| SignerError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| SignerError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from the hex form carried in `senderPublicKey`.
    pub fn from_hex(value: &str) -> Result<Self, SignerError> {
        let bytes = hex::decode(value).map_err(|e| SignerError::InvalidHex {
            field: "publicKey",
            message: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), SignerError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| SignerError::InvalidPublicKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| SignerError::VerificationError)
    }
}

/// Ed25519 signature (64 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
    /// Create from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignerError> {
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignerError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Hex form, as stored in `Transaction::signature`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let seed = Zeroizing::new(seed);
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create from a private key slice; must be a 32-byte seed.
    pub fn from_slice(private_key: &[u8]) -> Result<Self, SignerError> {
        let seed: Zeroizing<[u8; 32]> = Zeroizing::new(
            private_key
                .try_into()
                .map_err(|_| SignerError::InvalidPrivateKey(private_key.len()))?,
        );
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Secret seed, wiped on drop.
    pub fn to_seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}
