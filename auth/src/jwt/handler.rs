use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::claims::Claims;
use super::errors::JwtError;
use crate::codec;

type HmacSha256 = Hmac<Sha256>;

/// JWT header (fixed for HS256)
const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// JWT token handler bound to a signing secret and token lifetime.
///
/// Tokens are HS256 (HMAC with SHA-256) JWTs in compact serialization.
#[derive(Clone)]
pub struct JwtHandler {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `ttl_seconds` - Lifetime of issued tokens
    ///
    /// # Security Notes
    /// - An empty secret disables issuing and verification entirely
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            secret: secret.to_vec(),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Issue a token for `claims` with the configured lifetime.
    pub fn issue(&self, claims: &Claims) -> Result<String, JwtError> {
        issue(claims, &self.secret, self.ttl_seconds)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        verify(token, &self.secret)
    }

    /// Decode token without validation (for inspection only).
    ///
    /// # Security Warning
    /// This does NOT validate the token signature or expiry. Never trust
    /// claims from this method for authorization decisions.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, JwtError> {
        let (_, payload_b64, _) = split_token(token)?;
        decode_payload(payload_b64).map(Claims::from)
    }
}

/// Issue a signed token.
///
/// `iat` is set to the current time and `exp` to `iat + ttl_seconds`; values
/// supplied by the caller for either claim are overwritten.
///
/// # Errors
/// * `NoSecret` - `secret` is empty
/// * `EncodingFailed` - Payload serialization failed
pub fn issue(claims: &Claims, secret: &[u8], ttl_seconds: i64) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::NoSecret);
    }

    let issued_at = Utc::now().timestamp();
    let payload = claims.to_payload(issued_at, issued_at.saturating_add(ttl_seconds));
    let payload_json = serde_json::to_string(&Value::Object(payload))
        .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

    let header_b64 = codec::encode(JWT_HEADER);
    let payload_b64 = codec::encode(payload_json);
    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = sign(secret, signing_input.as_bytes())?;

    Ok(format!("{signing_input}.{}", codec::encode(signature)))
}

/// Verify a token against `secret` at the current time.
///
/// # Errors
/// * `NoSecret` - `secret` is empty
/// * `MalformedToken` - Token is not three non-empty dot-separated parts
/// * `SignatureMismatch` - Signature is not valid base64url or does not match
/// * `InvalidPayload` - Payload is not a base64url-encoded JSON object
/// * `TokenExpired` - Numeric `exp` claim lies in the past
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
    verify_at(token, secret, Utc::now().timestamp())
}

/// Verify a token against `secret` as of `now` (Unix timestamp).
pub fn verify_at(token: &str, secret: &[u8], now: i64) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::NoSecret);
    }

    let (header_b64, payload_b64, signature_b64) = split_token(token)?;

    // Signature first; nothing from the payload is looked at before it matches
    let signing_input = format!("{header_b64}.{payload_b64}");
    let expected = sign(secret, signing_input.as_bytes())?;
    let provided = codec::decode(signature_b64).map_err(|_| JwtError::SignatureMismatch)?;

    if !bool::from(provided.as_slice().ct_eq(expected.as_slice())) {
        return Err(JwtError::SignatureMismatch);
    }

    let payload = decode_payload(payload_b64)?;

    // A non-numeric exp is not enforced
    if let Some(exp) = payload.get("exp").and_then(Value::as_f64) {
        if (now as f64) > exp {
            return Err(JwtError::TokenExpired);
        }
    }

    Ok(Claims::from(payload))
}

fn split_token(token: &str) -> Result<(&str, &str, &str), JwtError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [header, payload, signature]
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((*header, *payload, *signature))
        }
        _ => Err(JwtError::MalformedToken),
    }
}

fn decode_payload(payload_b64: &str) -> Result<serde_json::Map<String, Value>, JwtError> {
    let bytes =
        codec::decode(payload_b64).map_err(|e| JwtError::InvalidPayload(e.to_string()))?;

    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtError::InvalidPayload(
            "payload is not a JSON object".to_string(),
        )),
        Err(e) => Err(JwtError::InvalidPayload(e.to_string())),
    }
}

fn sign(secret: &[u8], input: &[u8]) -> Result<Vec<u8>, JwtError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}
