use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CredentialType, ValidationCode};

/// How long an issued credential stays valid.
pub const VALIDITY_HOURS: i64 = 4;

/// A signed, time-boxed proof-of-age credential.
///
/// Immutable once issued. The wire form is camelCase JSON; the same
/// document is returned by the issuance endpoint and embedded in the
/// holder's QR payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque unique identifier, fresh per issuance.
    pub id: String,
    /// Subject the credential attests for.
    pub subject_id: String,
    /// Credential type.
    pub credential_type: CredentialType,
    /// When the credential was issued.
    pub issued_at: DateTime<Utc>,
    /// When the credential stops being valid. Always
    /// `issued_at + VALIDITY_HOURS`.
    pub expires_at: DateTime<Utc>,
    /// Whether the subject was at least 18 at issuance.
    pub is_over_18: bool,
    /// Whether the subject was at least 21 at issuance.
    pub is_over_21: bool,
    /// Public lookup token for verification.
    pub validation_code: ValidationCode,
    /// The issuing authority.
    pub issuer: String,
    /// Hex-encoded HMAC-SHA256 over the canonical signing payload.
    pub signature: String,
}

impl Credential {
    /// Assemble an unsigned credential for the given subject and age.
    ///
    /// Derives the age-threshold claims and the expiry from `issued_at`;
    /// the signature field is filled in by the issuer afterwards.
    pub fn new(
        subject_id: String,
        credential_type: CredentialType,
        age: i64,
        issued_at: DateTime<Utc>,
        validation_code: ValidationCode,
        issuer: String,
    ) -> Self {
        Self {
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            subject_id,
            credential_type,
            issued_at,
            expires_at: issued_at + Duration::hours(VALIDITY_HOURS),
            is_over_18: age >= 18,
            is_over_21: age >= 21,
            validation_code,
            issuer,
            signature: String::new(),
        }
    }

    /// Compute the canonical signing payload for this credential.
    ///
    /// A deterministic JSON document over the signed fields. `age` is a
    /// signed field but intentionally not a credential field, so the
    /// caller supplies it; the issuance record retains it for
    /// verification. Key order is fixed by the serializer, so identical
    /// inputs always produce identical bytes.
    pub fn signing_payload(&self, age: i64) -> Vec<u8> {
        let canonical = serde_json::json!({
            "subjectId": self.subject_id,
            "credentialType": self.credential_type,
            "age": age,
            "issuedAt": self.issued_at.to_rfc3339(),
            "validationCode": self.validation_code,
        });
        serde_json::to_vec(&canonical).unwrap_or_default()
    }

    /// Whether the credential has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the credential has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
