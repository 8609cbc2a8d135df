/// Core model errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("unsupported credential type: {0}")]
    UnsupportedCredentialType(String),

    #[error("invalid validation code: {0}")]
    InvalidValidationCode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
