//! Manx ID Crypto. Issuer secret handling, the HMAC-SHA256 signing
//! primitive, and validation-code generation.

pub mod code;
pub mod error;
pub mod mac;
pub mod secret;

pub use code::generate_validation_code;
pub use error::CryptoError;
pub use mac::{sign, verify, CredentialSignature};
pub use secret::IssuerSecret;
