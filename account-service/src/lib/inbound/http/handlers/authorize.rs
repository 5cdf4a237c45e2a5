use auth::AuthorizerRequest;
use auth::PolicyResponse;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::inbound::http::router::AppState;

/// Evaluate an authorizer event and return the policy document.
///
/// Always answers 200; the decision is carried by the policy `Effect`. A body
/// that is not a valid event is treated as an event without credentials.
pub async fn authorize(State(state): State<AppState>, body: Bytes) -> Json<PolicyResponse> {
    let request = serde_json::from_slice::<AuthorizerRequest>(&body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unreadable authorizer event");
        AuthorizerRequest::default()
    });

    Json(state.authorizer.authorize(&request).to_policy())
}
