use async_trait::async_trait;
use auth::DigestRecord;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::CredentialUpdate;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Profile;
use crate::domain::user::models::PutOutcome;
use crate::domain::user::ports::CredentialStore;
use crate::user::errors::UserError;

const SELECT_COLUMNS: &str =
    "email, password_digest, display_name, profile, created_at, updated_at";

/// PostgreSQL credential store. Digest and profile are kept as JSONB.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(e: sqlx::Error) -> UserError {
    UserError::StoreError(e.to_string())
}

fn record_from_row(row: &PgRow) -> Result<CredentialRecord, UserError> {
    let email: String = row.try_get("email").map_err(store_error)?;
    let Json(password_digest): Json<DigestRecord> =
        row.try_get("password_digest").map_err(store_error)?;
    let Json(profile): Json<Profile> = row.try_get("profile").map_err(store_error)?;

    Ok(CredentialRecord {
        identity: EmailAddress::new(&email)
            .map_err(|e| UserError::StoreError(format!("Stored identity is invalid: {}", e)))?,
        password_digest,
        display_name: row.try_get("display_name").map_err(store_error)?,
        profile,
        created_at: row.try_get("created_at").map_err(store_error)?,
        updated_at: row.try_get("updated_at").map_err(store_error)?,
    })
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn get(&self, identity: &EmailAddress) -> Result<Option<CredentialRecord>, UserError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM credentials WHERE email = $1",
            SELECT_COLUMNS
        ))
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn put_if_absent(&self, record: CredentialRecord) -> Result<PutOutcome, UserError> {
        let result = sqlx::query(
            r#"
            INSERT INTO credentials (email, password_digest, display_name, profile, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(record.identity.as_str())
        .bind(Json(&record.password_digest))
        .bind(&record.display_name)
        .bind(Json(&record.profile))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            Ok(PutOutcome::AlreadyExists)
        } else {
            Ok(PutOutcome::Created)
        }
    }

    async fn update(
        &self,
        identity: &EmailAddress,
        update: CredentialUpdate,
    ) -> Result<CredentialRecord, UserError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE credentials SET
                display_name = COALESCE($2, display_name),
                profile = COALESCE($3, profile),
                updated_at = NOW()
            WHERE email = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(identity.as_str())
        .bind(update.display_name)
        .bind(update.profile.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(UserError::NotFound(identity.to_string())),
        }
    }

    async fn delete(&self, identity: &EmailAddress) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM credentials WHERE email = $1")
            .bind(identity.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(identity.to_string()));
        }

        Ok(())
    }
}
