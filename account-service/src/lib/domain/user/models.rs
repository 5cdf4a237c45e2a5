use std::fmt;
use std::str::FromStr;

use auth::DigestRecord;
use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;

use crate::user::errors::EmailError;
use crate::user::errors::ValidationError;

/// Free-form profile attributes, stored as a JSON object.
pub type Profile = Map<String, Value>;

/// Credential record aggregate.
///
/// Keyed by the normalized email address. Timestamps are maintained by the
/// credential store.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub identity: EmailAddress,
    pub password_digest: DigestRecord,
    pub display_name: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(
        identity: EmailAddress,
        password_digest: DigestRecord,
        display_name: String,
        profile: Profile,
    ) -> Self {
        let now = Utc::now();
        Self {
            identity,
            password_digest,
            display_name,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// Minimal record for an identity first seen through a verified token.
    ///
    /// Its digest is empty, so it can never be used to log in.
    pub fn placeholder(identity: EmailAddress) -> Self {
        Self::new(identity, DigestRecord::default(), String::new(), Profile::new())
    }
}

/// Email address type
///
/// Trimmed and lower-cased before RFC 5322 validation; the normalized form is
/// the credential store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new normalized email address.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub display_name: String,
    pub profile: Profile,
}

impl RegisterCommand {
    /// Construct a new registration command.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is empty or malformed
    /// * `MissingField` - Password is empty after trimming
    pub fn new(
        email: &str,
        password: String,
        display_name: Option<String>,
        profile: Option<Profile>,
    ) -> Result<Self, ValidationError> {
        let email = EmailAddress::new(email)?;
        let password = required_password(password)?;

        Ok(Self {
            email,
            password,
            display_name: display_name.unwrap_or_default().trim().to_string(),
            profile: profile.unwrap_or_default(),
        })
    }
}

/// Command to exchange credentials for an access token
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: &str, password: String) -> Result<Self, ValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: required_password(password)?,
        })
    }
}

/// Command to update the caller's profile.
///
/// `profile` entries are merged into the stored profile; absent fields are
/// left untouched.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub display_name: Option<String>,
    pub profile: Option<Profile>,
}

/// Partial field set applied by the credential store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialUpdate {
    pub display_name: Option<String>,
    pub profile: Option<Profile>,
}

/// Result of a conditional create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    AlreadyExists,
}

// Only emptiness is checked; the password itself is kept verbatim
fn required_password(password: String) -> Result<String, ValidationError> {
    if password.trim().is_empty() {
        Err(ValidationError::MissingField("password"))
    } else {
        Ok(password)
    }
}
