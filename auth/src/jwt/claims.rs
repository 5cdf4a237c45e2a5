use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// JWT claims carried by access tokens.
///
/// `sub` and `email` identify the holder; `iat` and `exp` are always stamped by
/// the issuer. Any other claim lives in `extra` and is flattened into the
/// payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (identity of the token holder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims identifying an account by its email address.
    pub fn for_identity(email: impl ToString) -> Self {
        let email = email.to_string();
        Self::new().with_subject(&email).with_email(email)
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set email.
    pub fn with_email(mut self, email: impl ToString) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Identity of the holder: `sub`, falling back to `email`.
    ///
    /// Empty strings count as absent.
    pub fn identity(&self) -> Option<&str> {
        self.sub
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
    }

    /// Build the payload object with issuer-controlled timestamps.
    ///
    /// `iat` and `exp` always come from the arguments, whatever the claims or
    /// their extra fields say.
    pub(crate) fn to_payload(&self, issued_at: i64, expires_at: i64) -> Map<String, Value> {
        let mut payload: Map<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(sub) = &self.sub {
            payload.insert("sub".to_string(), Value::from(sub.as_str()));
        }
        if let Some(email) = &self.email {
            payload.insert("email".to_string(), Value::from(email.as_str()));
        }
        payload.insert("iat".to_string(), Value::from(issued_at));
        payload.insert("exp".to_string(), Value::from(expires_at));

        payload
    }
}

impl From<Map<String, Value>> for Claims {
    /// Lift a verified payload into typed claims.
    ///
    /// Registered claims with an unexpected JSON type are kept in `extra`
    /// instead of failing the conversion.
    fn from(payload: Map<String, Value>) -> Self {
        let mut claims = Claims::new();

        for (key, value) in payload {
            match (key.as_str(), value) {
                ("sub", Value::String(s)) => claims.sub = Some(s),
                ("email", Value::String(s)) => claims.email = Some(s),
                ("iat", Value::Number(n)) => claims.iat = number_to_timestamp(&n),
                ("exp", Value::Number(n)) => claims.exp = number_to_timestamp(&n),
                (_, value) => {
                    claims.extra.insert(key, value);
                }
            }
        }

        claims
    }
}

fn number_to_timestamp(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))
}
