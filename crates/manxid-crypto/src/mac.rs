use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::CryptoError;
use crate::secret::IssuerSecret;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 tag over a credential's canonical payload (32 bytes).
#[derive(Debug, Clone)]
pub struct CredentialSignature {
    tag: [u8; 32],
}

impl CredentialSignature {
    /// Get the raw tag bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.tag
    }

    /// Create from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let tag: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self { tag })
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.tag)
    }

    /// Decode from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

/// Sign a canonical payload with the issuer secret.
pub fn sign(payload: &[u8], secret: &IssuerSecret) -> CredentialSignature {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    let tag: [u8; 32] = mac.finalize().into_bytes().into();
    CredentialSignature { tag }
}

/// Verify a signature against a freshly computed HMAC.
///
/// The comparison is constant-time so a mismatch reveals nothing about
/// how close the presented tag was.
pub fn verify(
    payload: &[u8],
    secret: &IssuerSecret,
    signature: &CredentialSignature,
) -> Result<(), CryptoError> {
    let expected = sign(payload, secret);
    if bool::from(expected.tag.ct_eq(&signature.tag)) {
        Ok(())
    } else {
        Err(CryptoError::SignatureVerificationFailed)
    }
}
