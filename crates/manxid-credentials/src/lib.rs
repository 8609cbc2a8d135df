//! Manx ID Credentials. Issuer, verifier, credential store, and the QR
//! payload for the proof-of-age scheme.

pub mod error;
pub mod issuer;
pub mod qr;
pub mod store;
pub mod verifier;

pub use error::CredentialError;
pub use issuer::{CredentialIssuer, IssueRequest};
pub use qr::QrPayload;
pub use store::{CredentialStore, IssuanceRecord, MemoryStore, StoreError};
pub use verifier::{CredentialVerifier, VerificationOutcome, VerifiedClaims};
