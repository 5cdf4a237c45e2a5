use thiserror::Error;

/// Error type for JWT operations.
///
/// Every verification failure is its own variant so callers can branch or log
/// on the cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("No signing secret configured")]
    NoSecret,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token payload is invalid: {0}")]
    InvalidPayload(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

impl JwtError {
    /// Stable reason code reported in authorization decisions.
    pub fn reason(&self) -> &'static str {
        match self {
            JwtError::NoSecret => "no_secret",
            JwtError::MalformedToken => "malformed_token",
            JwtError::SignatureMismatch => "signature_mismatch",
            JwtError::InvalidPayload(_) => "invalid_payload",
            JwtError::TokenExpired => "token_expired",
            JwtError::EncodingFailed(_) => "encoding_failed",
        }
    }
}
