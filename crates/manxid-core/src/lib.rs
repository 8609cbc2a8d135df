//! Manx ID Core. Fundamental types and the proof-of-age credential model
//! for the Manx ID digital identity service.

pub mod credential;
pub mod error;
pub mod types;

pub use credential::{Credential, VALIDITY_HOURS};
pub use error::CoreError;
pub use types::{AuthenticatedIdentity, CredentialType, ValidationCode};
