use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use manxid_core::ValidationCode;
use manxid_crypto::{verify, CredentialSignature, IssuerSecret};

use crate::error::CredentialError;
use crate::store::CredentialStore;

/// Claims disclosed by a successful verification.
///
/// Deliberately contains no subject identifier: the response never says
/// more than the credential itself discloses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedClaims {
    /// Whether the subject was at least 18 at issuance.
    pub is_over_18: bool,
    /// Whether the subject was at least 21 at issuance.
    pub is_over_21: bool,
    /// The issuing authority.
    pub issuer: String,
    /// When the credential stops (or stopped) being valid.
    pub expires_at: DateTime<Utc>,
    /// When this verification was performed.
    pub verified_at: DateTime<Utc>,
}

/// Outcome of checking a validation code.
///
/// Unknown codes, malformed codes, signature mismatches, and revoked
/// credentials all collapse into `NotFound` so the verifier never acts
/// as a validity oracle. `Expired` is only reported for credentials
/// whose signature verified.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// The code does not correspond to a valid credential.
    NotFound,
    /// The credential is authentic and within its validity window.
    Valid(VerifiedClaims),
    /// The credential is authentic but past its expiry.
    Expired(VerifiedClaims),
}

impl VerificationOutcome {
    /// Whether the outcome attests a currently valid credential.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Verifies validation codes against the issuance store.
pub struct CredentialVerifier {
    /// The issuer secret used to recompute signatures.
    secret: IssuerSecret,
    /// Issuance records, keyed by validation code.
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    /// Create a new verifier.
    pub fn new(secret: IssuerSecret, store: Arc<dyn CredentialStore>) -> Self {
        Self { secret, store }
    }

    /// Verify a validation code as presented by a third party.
    pub fn verify(&self, code: &str) -> Result<VerificationOutcome, CredentialError> {
        self.verify_at(code, Utc::now())
    }

    /// Verify a validation code at a specific instant.
    pub fn verify_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationOutcome, CredentialError> {
        // Malformed codes are rejected before any store access.
        let code = match ValidationCode::parse(code) {
            Ok(code) => code,
            Err(_) => {
                tracing::debug!("malformed validation code");
                return Ok(VerificationOutcome::NotFound);
            }
        };

        let record = match self.store.get(&code)? {
            Some(record) => record,
            None => return Ok(VerificationOutcome::NotFound),
        };

        let signature = match CredentialSignature::from_hex(&record.credential.signature) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(
                    credential_id = %record.credential.id,
                    error = %e,
                    "stored signature is malformed"
                );
                return Ok(VerificationOutcome::NotFound);
            }
        };

        let payload = record.credential.signing_payload(record.age);
        if verify(&payload, &self.secret, &signature).is_err() {
            tracing::warn!(
                credential_id = %record.credential.id,
                "signature mismatch"
            );
            return Ok(VerificationOutcome::NotFound);
        }

        if record.revoked {
            tracing::info!(
                credential_id = %record.credential.id,
                "revoked credential presented"
            );
            return Ok(VerificationOutcome::NotFound);
        }

        let claims = VerifiedClaims {
            is_over_18: record.credential.is_over_18,
            is_over_21: record.credential.is_over_21,
            issuer: record.credential.issuer.clone(),
            expires_at: record.credential.expires_at,
            verified_at: now,
        };

        if record.credential.is_expired_at(now) {
            Ok(VerificationOutcome::Expired(claims))
        } else {
            Ok(VerificationOutcome::Valid(claims))
        }
    }
}
