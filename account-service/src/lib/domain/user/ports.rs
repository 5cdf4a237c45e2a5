use async_trait::async_trait;
use auth::AuthenticationResult;

use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::CredentialUpdate;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PutOutcome;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::user::errors::UserError;

/// Port for account domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and optional profile data
    ///
    /// # Returns
    /// Created credential record
    ///
    /// # Errors
    /// * `AlreadyRegistered` - A record for this email already exists
    /// * `Password` - Password hashing failed
    /// * `StoreError` - Credential store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<CredentialRecord, UserError>;

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or unverifiable record
    /// * `NoSecret` - No signing secret configured
    /// * `StoreError` - Credential store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, UserError>;

    /// Fetch the caller's record, creating a minimal one on first access.
    ///
    /// # Errors
    /// * `StoreError` - Credential store operation failed
    async fn get_profile(&self, identity: &EmailAddress) -> Result<CredentialRecord, UserError>;

    /// Update the caller's display name and merge profile attributes.
    ///
    /// # Errors
    /// * `NotFound` - Record vanished between read and write
    /// * `StoreError` - Credential store operation failed
    async fn update_profile(
        &self,
        identity: &EmailAddress,
        command: UpdateProfileCommand,
    ) -> Result<CredentialRecord, UserError>;

    /// Remove the caller's account.
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist
    /// * `StoreError` - Credential store operation failed
    async fn delete_account(&self, identity: &EmailAddress) -> Result<(), UserError>;
}

/// Key-value credential store collaborator.
///
/// Only "last write observed on next read" is assumed. Registration races are
/// settled by the conditional create in `put_if_absent`.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve a record by identity.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `StoreError` - Store operation failed
    async fn get(&self, identity: &EmailAddress) -> Result<Option<CredentialRecord>, UserError>;

    /// Create a record unless one already exists for its identity.
    ///
    /// # Returns
    /// `Created`, or `AlreadyExists` leaving the stored record untouched
    ///
    /// # Errors
    /// * `StoreError` - Store operation failed
    async fn put_if_absent(&self, record: CredentialRecord) -> Result<PutOutcome, UserError>;

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Returns
    /// Record as stored after the update
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist
    /// * `StoreError` - Store operation failed
    async fn update(
        &self,
        identity: &EmailAddress,
        update: CredentialUpdate,
    ) -> Result<CredentialRecord, UserError>;

    /// Remove a record.
    ///
    /// # Errors
    /// * `NotFound` - Record does not exist
    /// * `StoreError` - Store operation failed
    async fn delete(&self, identity: &EmailAddress) -> Result<(), UserError>;
}
