use std::collections::HashMap;

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified caller identity
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: EmailAddress,
}

/// Middleware that runs the authorizer over the request headers and adds the
/// caller identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let resource = format!("{} {}", req.method(), req.uri().path());
    let decision = state
        .authorizer
        .authorize_headers(header_map(req.headers()), &resource);

    if let Some(reason) = &decision.denial {
        return Err(unauthorized("Unauthorized", reason.code()));
    }

    // Principals without an email-shaped identity cannot own an account
    let identity = EmailAddress::new(&decision.principal).map_err(|e| {
        tracing::warn!(
            principal = %decision.principal,
            error = %e,
            "Token does not identify an account"
        );
        unauthorized("Token does not identify an account", "invalid_identity")
    })?;

    req.extensions_mut()
        .insert(AuthenticatedUser { identity });

    Ok(next.run(req).await)
}

// Non UTF-8 header values are skipped
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

fn unauthorized(message: &str, reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status_code": StatusCode::UNAUTHORIZED.as_u16(),
            "data": {
                "message": message,
                "reason": reason,
            }
        })),
    )
        .into_response()
}
