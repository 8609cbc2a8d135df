use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use manxid_core::{AuthenticatedIdentity, Credential, CredentialType};
use manxid_crypto::{generate_validation_code, sign, IssuerSecret};

use crate::error::CredentialError;
use crate::store::{CredentialStore, IssuanceRecord, StoreError};

/// How many fresh validation codes to try before giving up on a
/// persistent store collision.
const MAX_CODE_ATTEMPTS: usize = 4;

/// An issuance request from an authenticated wallet holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Subject to issue for. Must match the caller's authenticated
    /// identity.
    pub subject_id: String,
    /// Wire-format credential type string.
    pub credential_type: String,
    /// The subject's age in whole years.
    pub age: i64,
}

/// Mints proof-of-age credentials signed with the issuer secret.
pub struct CredentialIssuer {
    /// Name of the issuing authority, embedded in every credential.
    issuer_name: String,
    /// The signing secret.
    secret: IssuerSecret,
    /// Issuance records, keyed by validation code.
    store: Arc<dyn CredentialStore>,
}

impl CredentialIssuer {
    /// Create a new issuer.
    pub fn new(
        issuer_name: String,
        secret: IssuerSecret,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            issuer_name,
            secret,
            store,
        }
    }

    /// Name of the issuing authority.
    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    /// Issue a credential for the authenticated subject.
    pub fn issue(
        &self,
        identity: &AuthenticatedIdentity,
        request: &IssueRequest,
    ) -> Result<Credential, CredentialError> {
        self.issue_at(identity, request, Utc::now())
    }

    /// Issue a credential with a specific issuance instant.
    ///
    /// The expiry is always derived from `issued_at`, never supplied by
    /// the caller.
    pub fn issue_at(
        &self,
        identity: &AuthenticatedIdentity,
        request: &IssueRequest,
        issued_at: DateTime<Utc>,
    ) -> Result<Credential, CredentialError> {
        if request.subject_id != identity.subject_id {
            tracing::warn!(
                requested = %request.subject_id,
                authenticated = %identity.subject_id,
                "issuance rejected: subject mismatch"
            );
            return Err(CredentialError::Unauthorized);
        }

        let credential_type = CredentialType::parse(&request.credential_type)
            .map_err(|_| CredentialError::UnsupportedCredentialType(request.credential_type.clone()))?;

        if request.age < 0 {
            return Err(CredentialError::InvalidInput(
                "age must be a non-negative integer".into(),
            ));
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_validation_code();
            let mut credential = Credential::new(
                request.subject_id.clone(),
                credential_type,
                request.age,
                issued_at,
                code,
                self.issuer_name.clone(),
            );
            credential.signature =
                sign(&credential.signing_payload(request.age), &self.secret).to_hex();

            match self
                .store
                .insert(IssuanceRecord::new(credential.clone(), request.age))
            {
                Ok(()) => {
                    tracing::info!(
                        issuer = %self.issuer_name,
                        subject = %credential.subject_id,
                        credential_id = %credential.id,
                        expires = %credential.expires_at,
                        "credential issued"
                    );
                    return Ok(credential);
                }
                Err(StoreError::CodeCollision) => {
                    tracing::warn!("validation code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CredentialError::Store(StoreError::CodeCollision))
    }
}
