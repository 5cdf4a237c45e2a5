use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::Claims;
use auth::JwtError;

use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::CredentialUpdate;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PutOutcome;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStore;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Password derivation is CPU-bound and runs on the blocking thread pool.
pub struct UserService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> UserService<CS>
where
    CS: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential store implementation
    /// * `authenticator` - Password hashing and token issuing
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    async fn ensure_record(&self, identity: &EmailAddress) -> Result<CredentialRecord, UserError> {
        if let Some(record) = self.store.get(identity).await? {
            return Ok(record);
        }

        let record = CredentialRecord::placeholder(identity.clone());
        match self.store.put_if_absent(record.clone()).await? {
            PutOutcome::Created => {
                tracing::info!(identity = %identity, "Created record for authorized identity");
                Ok(record)
            }
            // Lost a creation race; the winner's record is authoritative
            PutOutcome::AlreadyExists => self
                .store
                .get(identity)
                .await?
                .ok_or_else(|| UserError::NotFound(identity.to_string())),
        }
    }
}

#[async_trait]
impl<CS> UserServicePort for UserService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<CredentialRecord, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_digest =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))??;

        let record = CredentialRecord::new(
            command.email,
            password_digest,
            command.display_name,
            command.profile,
        );

        match self.store.put_if_absent(record.clone()).await? {
            PutOutcome::Created => {
                tracing::info!(identity = %record.identity, "Account registered");
                Ok(record)
            }
            PutOutcome::AlreadyExists => {
                tracing::warn!(
                    identity = %record.identity,
                    kind = "already_registered",
                    "Registration rejected"
                );
                Err(UserError::AlreadyRegistered(record.identity.to_string()))
            }
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, UserError> {
        let Some(record) = self.store.get(&command.email).await? else {
            tracing::warn!(identity = %command.email, kind = "unknown_identity", "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        let mut claims = Claims::for_identity(record.identity.as_str());
        if !record.display_name.is_empty() {
            claims = claims.with_extra("name", &record.display_name);
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let digest = record.password_digest;
        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &digest, &claims)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        let error = match outcome {
            Ok(result) => {
                tracing::info!(identity = %command.email, "Login succeeded");
                return Ok(result);
            }
            Err(AuthenticationError::InvalidCredentials) => UserError::InvalidCredentials,
            Err(AuthenticationError::PasswordError(e)) => UserError::Password(e),
            Err(AuthenticationError::JwtError(JwtError::NoSecret)) => UserError::NoSecret,
            Err(AuthenticationError::JwtError(e)) => UserError::Token(e),
        };

        tracing::warn!(identity = %command.email, kind = error.kind(), "Login rejected");
        Err(error)
    }

    async fn get_profile(&self, identity: &EmailAddress) -> Result<CredentialRecord, UserError> {
        self.ensure_record(identity).await
    }

    async fn update_profile(
        &self,
        identity: &EmailAddress,
        command: UpdateProfileCommand,
    ) -> Result<CredentialRecord, UserError> {
        let current = self.ensure_record(identity).await?;

        let profile = command.profile.map(|incoming| {
            let mut merged = current.profile;
            merged.extend(incoming);
            merged
        });

        let update = CredentialUpdate {
            display_name: command.display_name.map(|name| name.trim().to_string()),
            profile,
        };

        let updated = self.store.update(identity, update).await?;
        tracing::info!(identity = %identity, "Profile updated");
        Ok(updated)
    }

    async fn delete_account(&self, identity: &EmailAddress) -> Result<(), UserError> {
        self.store.delete(identity).await?;
        tracing::info!(identity = %identity, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auth::DigestRecord;
    use auth::PasswordHasher;
    use mockall::mock;
    use mockall::predicate::*;
    use serde_json::json;

    use super::*;
    use crate::domain::user::models::Profile;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    // Define mocks in the test module using mockall
    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn get(&self, identity: &EmailAddress) -> Result<Option<CredentialRecord>, UserError>;
            async fn put_if_absent(&self, record: CredentialRecord) -> Result<PutOutcome, UserError>;
            async fn update(&self, identity: &EmailAddress, update: CredentialUpdate) -> Result<CredentialRecord, UserError>;
            async fn delete(&self, identity: &EmailAddress) -> Result<(), UserError>;
        }
    }

    fn authenticator(secret: &[u8]) -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(secret, 3600)
                .with_password_hasher(PasswordHasher::with_iterations(1_000)),
        )
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).unwrap()
    }

    fn stored_record(raw_email: &str, password: &str) -> CredentialRecord {
        let digest = PasswordHasher::with_iterations(1_000).hash(password).unwrap();
        CredentialRecord::new(email(raw_email), digest, "Alice".to_string(), Profile::new())
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_put_if_absent()
            .withf(|record| {
                record.identity.as_str() == "alice@example.com"
                    && record.password_digest.algorithm == "pbkdf2_sha256"
                    && record.password_digest.is_complete()
            })
            .times(1)
            .returning(|_| Ok(PutOutcome::Created));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let command =
            RegisterCommand::new("Alice@Example.com", "secret123".to_string(), None, None).unwrap();
        let record = service.register(command).await.expect("registration failed");

        assert_eq!(record.identity.as_str(), "alice@example.com");
        assert!(PasswordHasher::new().verify("secret123", &record.password_digest));
    }

    #[tokio::test]
    async fn test_register_already_registered() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_put_if_absent()
            .times(1)
            .returning(|_| Ok(PutOutcome::AlreadyExists));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let command =
            RegisterCommand::new("alice@example.com", "secret123".to_string(), None, None).unwrap();
        let result = service.register(command).await;

        assert!(matches!(result, Err(UserError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut store = MockTestCredentialStore::new();
        let record = stored_record("alice@example.com", "secret123");

        store
            .expect_get()
            .with(eq(email("alice@example.com")))
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let authenticator = authenticator(SECRET);
        let service = UserService::new(Arc::new(store), Arc::clone(&authenticator));

        let command = LoginCommand::new("alice@example.com", "secret123".to_string()).unwrap();
        let result = service.login(command).await.expect("login failed");

        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.expires_in, 3600);

        let claims = authenticator.validate_token(&result.token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.extra["name"], json!("Alice"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut store = MockTestCredentialStore::new();
        let record = stored_record("alice@example.com", "secret123");

        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let command = LoginCommand::new("alice@example.com", "wrong".to_string()).unwrap();
        let result = service.login(command).await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_identity() {
        let mut store = MockTestCredentialStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let command = LoginCommand::new("nobody@example.com", "secret123".to_string()).unwrap();
        let result = service.login(command).await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_placeholder_record() {
        let mut store = MockTestCredentialStore::new();
        let record = CredentialRecord::placeholder(email("alice@example.com"));

        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let command = LoginCommand::new("alice@example.com", "anything".to_string()).unwrap();
        let result = service.login(command).await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_without_secret() {
        let mut store = MockTestCredentialStore::new();
        let record = stored_record("alice@example.com", "secret123");

        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = UserService::new(Arc::new(store), authenticator(b""));

        let command = LoginCommand::new("alice@example.com", "secret123".to_string()).unwrap();
        let result = service.login(command).await;

        assert!(matches!(result, Err(UserError::NoSecret)));
    }

    #[tokio::test]
    async fn test_get_profile_creates_placeholder() {
        let mut store = MockTestCredentialStore::new();

        store.expect_get().times(1).returning(|_| Ok(None));
        store
            .expect_put_if_absent()
            .withf(|record| {
                record.identity.as_str() == "new@example.com"
                    && record.password_digest == DigestRecord::default()
            })
            .times(1)
            .returning(|_| Ok(PutOutcome::Created));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let record = service.get_profile(&email("new@example.com")).await.unwrap();
        assert_eq!(record.identity.as_str(), "new@example.com");
        assert!(record.display_name.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_merges_attributes() {
        let mut store = MockTestCredentialStore::new();
        let mut record = stored_record("alice@example.com", "secret123");
        record.profile.insert("city".to_string(), json!("Tokyo"));
        record.profile.insert("phone_number".to_string(), json!("000"));

        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        store
            .expect_update()
            .withf(|identity, update| {
                let profile = update.profile.as_ref().unwrap();
                identity.as_str() == "alice@example.com"
                    && update.display_name.as_deref() == Some("Alice B")
                    && profile["city"] == json!("Tokyo")
                    && profile["phone_number"] == json!("123")
            })
            .times(1)
            .returning(|identity, update| {
                let mut updated = stored_record(identity.as_str(), "secret123");
                updated.display_name = update.display_name.unwrap();
                updated.profile = update.profile.unwrap();
                Ok(updated)
            });

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let mut incoming = Profile::new();
        incoming.insert("phone_number".to_string(), json!("123"));
        let command = UpdateProfileCommand {
            display_name: Some(" Alice B ".to_string()),
            profile: Some(incoming),
        };

        let updated = service
            .update_profile(&email("alice@example.com"), command)
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Alice B");
        assert_eq!(updated.profile["city"], json!("Tokyo"));
    }

    #[tokio::test]
    async fn test_delete_account_not_found() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_delete()
            .times(1)
            .returning(|identity| Err(UserError::NotFound(identity.to_string())));

        let service = UserService::new(Arc::new(store), authenticator(SECRET));

        let result = service.delete_account(&email("gone@example.com")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
