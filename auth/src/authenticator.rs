use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::DigestRecord;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuing.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    /// Signed access token
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing; empty disables issuing
    /// * `ttl_seconds` - Lifetime of issued tokens
    pub fn new(jwt_secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, ttl_seconds),
        }
    }

    /// Replace the password hasher (e.g. to raise the iteration count).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn has_secret(&self) -> bool {
        self.jwt_handler.has_secret()
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.jwt_handler.ttl_seconds()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<DigestRecord, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored digest; false on any malformed record.
    pub fn verify_password(&self, password: &str, digest: &DigestRecord) -> bool {
        self.password_hasher.verify(password, digest)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `digest` - Stored password digest
    /// * `claims` - Claims to encode in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or digest is unverifiable
    /// * `JwtError` - Token generation failed (including a missing secret)
    pub fn authenticate(
        &self,
        password: &str,
        digest: &DigestRecord,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, digest) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let token = self.generate_token(claims)?;

        Ok(AuthenticationResult {
            token,
            token_type: "Bearer",
            expires_in: self.jwt_handler.ttl_seconds(),
        })
    }

    /// Issue a token without password verification.
    ///
    /// Useful for token refresh flows or when authentication
    /// has already been verified by other means.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.issue(claims)
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}
