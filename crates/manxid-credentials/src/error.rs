use crate::store::StoreError;

/// Credential system errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("unauthorized: subject does not match the authenticated identity")]
    Unauthorized,

    #[error("unsupported credential type: {0}")]
    UnsupportedCredentialType(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] manxid_crypto::CryptoError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
