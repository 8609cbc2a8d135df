use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Types of credentials the service can issue.
///
/// This is a closed set: issuance requests naming anything else are
/// rejected before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialType {
    /// Time-boxed attestation of the 18+ and 21+ age thresholds.
    #[serde(rename = "proof-of-age")]
    ProofOfAge,
}

impl CredentialType {
    /// Parse a wire-format type string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "proof-of-age" => Ok(Self::ProofOfAge),
            other => Err(CoreError::UnsupportedCredentialType(other.to_string())),
        }
    }

    /// The wire-format type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProofOfAge => "proof-of-age",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Public lookup token for an issued credential.
///
/// 16 random bytes rendered as 32 uppercase hex characters. The code is
/// the only key a verifier ever presents, so parsing is strict: anything
/// that is not exactly 32 hex characters is rejected before any store
/// access. Input case is normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationCode(String);

impl ValidationCode {
    /// Length of the rendered code in characters.
    pub const LEN: usize = 32;

    /// Parse a code from its wire form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() != Self::LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidValidationCode(s.to_string()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Render 16 raw bytes as a code.
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an authenticated wallet holder.
///
/// Produced by the session layer at the service edge and passed into the
/// issuer explicitly. Core code never reads ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Subject identifier established by the identity provider.
    pub subject_id: String,
}

impl AuthenticatedIdentity {
    /// Create an identity for the given subject.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
        }
    }
}
