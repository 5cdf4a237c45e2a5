use std::collections::HashMap;

use serde_json::Value;

use super::decision::AuthorizationDecision;
use super::decision::DenyReason;
use super::request::AuthorizerRequest;
use super::request::TokenSource;
use crate::jwt;

/// Principal used when a verified token names neither `sub` nor `email`.
pub const DEFAULT_PRINCIPAL: &str = "user";

/// Authorization decision engine.
///
/// Turns an inbound credential into an Allow/Deny decision. Every path yields
/// a complete decision; verification failures never escape as errors.
#[derive(Clone)]
pub struct Authorizer {
    secret: Vec<u8>,
}

impl Authorizer {
    /// Create an authorizer verifying tokens with `secret`.
    ///
    /// An empty secret denies every request.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Decide on an authorizer event.
    pub fn authorize(&self, request: &AuthorizerRequest) -> AuthorizationDecision {
        self.authorize_source(request.token_source().as_ref(), request.resource())
    }

    /// Decide on a plain header map, as presented to an HTTP endpoint.
    pub fn authorize_headers(
        &self,
        headers: HashMap<String, String>,
        resource: &str,
    ) -> AuthorizationDecision {
        self.authorize_source(Some(&TokenSource::HeaderMap(headers)), resource)
    }

    /// Decide on an already resolved credential source.
    pub fn authorize_source(
        &self,
        source: Option<&TokenSource>,
        resource: &str,
    ) -> AuthorizationDecision {
        if self.secret.is_empty() {
            return self.denied(DenyReason::NoSecret, resource);
        }

        let Some(token) = source.and_then(TokenSource::bearer_token) else {
            return self.denied(DenyReason::NoToken, resource);
        };

        match jwt::verify(token, &self.secret) {
            Ok(claims) => {
                let principal = claims.identity().unwrap_or(DEFAULT_PRINCIPAL).to_string();
                tracing::debug!(
                    principal = %principal,
                    resource = %resource,
                    "Authorization allowed"
                );

                let context = [
                    ("identity".to_string(), Value::from(principal.as_str())),
                    (
                        "email".to_string(),
                        claims.email.clone().map(Value::from).unwrap_or(Value::Null),
                    ),
                ];
                AuthorizationDecision::allow(principal, resource, context)
            }
            Err(e) => self.denied(DenyReason::Token(e), resource),
        }
    }

    fn denied(&self, reason: DenyReason, resource: &str) -> AuthorizationDecision {
        tracing::warn!(reason = reason.code(), resource = %resource, "Authorization denied");
        AuthorizationDecision::deny(reason, resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorizer::decision::Effect;
    use crate::jwt::Claims;
    use crate::jwt::JwtError;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn token_for(claims: &Claims) -> String {
        jwt::issue(claims, SECRET, 3600).unwrap()
    }

    fn header_request(name: &str, value: String) -> AuthorizerRequest {
        AuthorizerRequest {
            kind: Some("REQUEST".to_string()),
            headers: Some(HashMap::from([(name.to_string(), value)])),
            method_arn: Some("arn:test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_allow_from_header() {
        let token = token_for(&Claims::for_identity("alice@example.com"));
        let authorizer = Authorizer::new(SECRET);

        let decision =
            authorizer.authorize(&header_request("Authorization", format!("Bearer {token}")));

        assert_eq!(decision.effect, Effect::Allow);
        assert_eq!(decision.principal, "alice@example.com");
        assert_eq!(decision.resource, "arn:test");
        assert_eq!(decision.context["identity"], "alice@example.com");
        assert_eq!(decision.context["email"], "alice@example.com");
    }

    #[test]
    fn test_header_variants_extract_identically() {
        let token = token_for(&Claims::for_identity("alice@example.com"));
        let authorizer = Authorizer::new(SECRET);

        for name in ["Authorization", "authorization"] {
            for scheme in ["Bearer", "bearer"] {
                let decision =
                    authorizer.authorize(&header_request(name, format!("{scheme} {token}")));
                assert!(decision.is_allowed(), "{name}: {scheme}");
                assert_eq!(decision.principal, "alice@example.com");
            }
        }
    }

    #[test]
    fn test_allow_from_direct_token() {
        let token = token_for(&Claims::for_identity("bob@example.com"));
        let request = AuthorizerRequest {
            kind: Some("TOKEN".to_string()),
            authorization_token: Some(format!("Bearer {token}")),
            ..Default::default()
        };

        let decision = Authorizer::new(SECRET).authorize(&request);

        assert!(decision.is_allowed());
        assert_eq!(decision.resource, "*");
    }

    #[test]
    fn test_principal_fallbacks() {
        let authorizer = Authorizer::new(SECRET);
        let source = |claims: &Claims| TokenSource::DirectString(token_for(claims));

        let by_subject = Claims::new().with_subject("sub-id").with_email("e@example.com");
        let decision = authorizer.authorize_source(Some(&source(&by_subject)), "*");
        assert_eq!(decision.principal, "sub-id");

        let by_email = Claims::new().with_email("e@example.com");
        let decision = authorizer.authorize_source(Some(&source(&by_email)), "*");
        assert_eq!(decision.principal, "e@example.com");

        let anonymous = Claims::new().with_extra("role", "reader");
        let decision = authorizer.authorize_source(Some(&source(&anonymous)), "*");
        assert_eq!(decision.principal, "user");
        assert_eq!(decision.context["email"], "");
    }

    #[test]
    fn test_no_secret_denies_valid_token() {
        let token = token_for(&Claims::for_identity("alice@example.com"));

        let decision = Authorizer::new(b"")
            .authorize(&header_request("Authorization", format!("Bearer {token}")));

        assert_eq!(decision.effect, Effect::Deny);
        assert_eq!(decision.principal, "anonymous");
        assert_eq!(decision.context["reason"], "no_secret");
        assert_eq!(decision.denial, Some(DenyReason::NoSecret));
    }

    #[test]
    fn test_no_secret_denies_request_without_token() {
        let decision = Authorizer::new(b"").authorize(&AuthorizerRequest::default());
        assert_eq!(decision.context["reason"], "no_secret");
    }

    #[test]
    fn test_no_token() {
        let decision = Authorizer::new(SECRET).authorize(&AuthorizerRequest::default());

        assert_eq!(decision.effect, Effect::Deny);
        assert_eq!(decision.context["reason"], "no_token");
        assert_eq!(decision.resource, "*");
    }

    #[test]
    fn test_verification_failures_map_to_reasons() {
        let authorizer = Authorizer::new(SECRET);
        let expired = jwt::issue(&Claims::for_identity("a@example.com"), SECRET, -1).unwrap();
        let foreign = jwt::issue(&Claims::for_identity("a@example.com"), b"other", 60).unwrap();

        let cases = [
            ("not-a-token".to_string(), JwtError::MalformedToken),
            (expired, JwtError::TokenExpired),
            (foreign, JwtError::SignatureMismatch),
        ];

        for (token, expected) in cases {
            let request = header_request("authorization", format!("Bearer {token}"));
            let decision = authorizer.authorize(&request);

            assert_eq!(decision.effect, Effect::Deny);
            assert_eq!(decision.context["reason"], expected.reason());
            assert_eq!(decision.denial, Some(DenyReason::Token(expected)));
            assert_eq!(decision.resource, "arn:test");
        }
    }

    #[test]
    fn test_authorize_headers() {
        let token = token_for(&Claims::for_identity("alice@example.com"));
        let authorizer = Authorizer::new(SECRET);

        let allowed = authorizer.authorize_headers(
            HashMap::from([("AUTHORIZATION".to_string(), format!("Bearer {token}"))]),
            "GET /user/base",
        );
        assert!(allowed.is_allowed());
        assert_eq!(allowed.principal, "alice@example.com");
        assert_eq!(allowed.resource, "GET /user/base");

        let bare = authorizer.authorize_headers(
            HashMap::from([("Authorization".to_string(), token)]),
            "GET /user/base",
        );
        assert_eq!(bare.denial, Some(DenyReason::NoToken));
    }
}
