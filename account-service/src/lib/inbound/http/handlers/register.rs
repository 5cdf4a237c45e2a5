use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Profile;
use crate::domain::user::models::RegisterCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::ValidationError;

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::CREATED, record.into()))
}

/// HTTP request body for registration (raw JSON)
///
/// `user_id` is accepted as an alias for `email` when `email` is absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    profile: Option<Profile>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationError> {
        let email = self.email.or(self.user_id).unwrap_or_default();
        RegisterCommand::new(&email, self.password, self.name, self.profile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for RegisterResponseData {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            email: record.identity.as_str().to_string(),
            name: record.display_name.clone(),
            created_at: record.created_at,
        }
    }
}
