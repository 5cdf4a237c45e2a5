use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Profile;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .user_service
        .get_profile(&user.identity)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::OK, record.into()))
}

/// Response body for profile operations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponseData {
    pub email: String,
    pub name: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for ProfileResponseData {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            email: record.identity.as_str().to_string(),
            name: record.display_name.clone(),
            profile: record.profile.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
