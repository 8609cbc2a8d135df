use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use manxid_core::{Credential, CredentialType, ValidationCode};

use crate::error::CredentialError;

/// The machine-readable document embedded in the holder's QR code.
///
/// Carries only what the credential already discloses, plus a fully
/// qualified link to the public verification endpoint for the code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    /// Credential identifier.
    pub id: String,
    /// Credential type.
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    /// Public lookup token.
    pub validation_code: ValidationCode,
    /// 18+ claim.
    pub is_over_18: bool,
    /// 21+ claim.
    pub is_over_21: bool,
    /// The issuing authority.
    pub issuer: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Link a scanner can open to verify the code.
    pub verify_url: String,
}

impl QrPayload {
    /// Build the payload for an issued credential.
    ///
    /// `base_url` is the public origin of the verification endpoint,
    /// e.g. `https://id.gov.im`.
    pub fn for_credential(credential: &Credential, base_url: &str) -> Self {
        Self {
            id: credential.id.clone(),
            credential_type: credential.credential_type,
            validation_code: credential.validation_code.clone(),
            is_over_18: credential.is_over_18,
            is_over_21: credential.is_over_21,
            issuer: credential.issuer.clone(),
            issued_at: credential.issued_at,
            expires_at: credential.expires_at,
            verify_url: verify_url(base_url, &credential.validation_code),
        }
    }

    /// Serialize to the JSON string rendered into the QR code.
    pub fn to_json(&self) -> Result<String, CredentialError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The fully qualified verification link for a validation code.
pub fn verify_url(base_url: &str, code: &ValidationCode) -> String {
    format!("{}/verify/{}", base_url.trim_end_matches('/'), code)
}
