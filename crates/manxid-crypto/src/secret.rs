use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// The symmetric key used to compute and verify credential signatures.
///
/// Provisioned by the operator and owned by the issuer alone. There is no
/// built-in fallback value: construction fails rather than degrade to a
/// weak key. The bytes are wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IssuerSecret {
    bytes: Vec<u8>,
}

impl IssuerSecret {
    /// Minimum accepted key length in bytes.
    pub const MIN_LEN: usize = 32;

    /// Create a secret from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() < Self::MIN_LEN {
            return Err(CryptoError::SecretTooShort {
                min: Self::MIN_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Create a secret from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Generate a fresh secret from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; Self::MIN_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Hex encoding, for writing a freshly provisioned secret to disk.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Raw key bytes, for the signing primitive in this crate.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for IssuerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        write!(f, "IssuerSecret({} bytes)", self.bytes.len())
    }
}
