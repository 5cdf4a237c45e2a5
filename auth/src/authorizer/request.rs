use std::collections::HashMap;

use serde::Deserialize;

const BEARER_PREFIX: &str = "bearer ";

/// Inbound authorizer event.
///
/// Token-style events carry `authorizationToken`; request-style events carry
/// the full header map. Both may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizerRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(rename = "authorizationToken", default)]
    pub authorization_token: Option<String>,

    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(rename = "methodArn", default)]
    pub method_arn: Option<String>,
}

impl AuthorizerRequest {
    /// Resolve where the bearer credential comes from.
    ///
    /// A usable direct token string wins; otherwise the header map is used when
    /// present.
    pub fn token_source(&self) -> Option<TokenSource> {
        let direct = self
            .authorization_token
            .as_ref()
            .map(|token| TokenSource::DirectString(token.clone()))
            .filter(|source| source.bearer_token().is_some());

        direct.or_else(|| self.headers.clone().map(TokenSource::HeaderMap))
    }

    /// Resource the decision applies to, `*` when the event names none.
    pub fn resource(&self) -> &str {
        self.method_arn.as_deref().unwrap_or("*")
    }
}

/// Where a bearer credential was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A single authorization string, with or without the `Bearer` scheme
    DirectString(String),
    /// Request headers; the `Authorization` header must use the `Bearer` scheme
    HeaderMap(HashMap<String, String>),
}

impl TokenSource {
    /// Extract the candidate token, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = match self {
            TokenSource::DirectString(value) => strip_bearer(value).unwrap_or(value.trim()),
            TokenSource::HeaderMap(headers) => strip_bearer(authorization_header(headers)?)?,
        };

        Some(token).filter(|token| !token.is_empty())
    }
}

fn authorization_header(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .get("Authorization")
        .or_else(|| headers.get("authorization"))
        .or_else(|| {
            headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

fn strip_bearer(value: &str) -> Option<&str> {
    let value = value.trim_start();
    value
        .get(..BEARER_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX))
        .map(|_| value[BEARER_PREFIX.len()..].trim())
}
