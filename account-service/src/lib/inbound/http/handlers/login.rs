use auth::AuthenticationResult;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::JsonBody;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::ValidationError;

/// Exchange credentials for a token.
///
/// The body is `{token, token_type, expires_in}` at top level, without the
/// `{status_code, data}` envelope, so token clients can read it directly.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<AuthenticationResult>, ApiError> {
    state
        .user_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(Json)
}

/// HTTP request body for login; `user_id` is an alias for `email`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ValidationError> {
        let email = self.email.or(self.user_id).unwrap_or_default();
        LoginCommand::new(&email, self.password)
    }
}
