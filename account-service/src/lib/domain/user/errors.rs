use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for request validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Account already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("No signing secret configured")]
    NoSecret,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    // Infrastructure errors
    #[error("Credential store error: {0}")]
    StoreError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl UserError {
    /// Short kind label for audit logging.
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::Validation(_) => "validation_error",
            UserError::AlreadyRegistered(_) => "already_registered",
            UserError::InvalidCredentials => "invalid_credentials",
            UserError::NotFound(_) => "not_found",
            UserError::NoSecret => "no_secret",
            UserError::Password(_) => "password_error",
            UserError::Token(e) => e.reason(),
            UserError::StoreError(_) => "store_error",
            UserError::Unknown(_) => "unknown",
        }
    }
}
