use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::jwt::JwtError;

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal reported on every denial.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

/// Outcome of an authorization decision. There is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl From<&str> for Effect {
    /// Anything other than exactly `Allow` is a denial.
    fn from(value: &str) -> Self {
        match value {
            "Allow" => Effect::Allow,
            _ => Effect::Deny,
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NoSecret,
    NoToken,
    Token(JwtError),
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NoSecret => "no_secret",
            DenyReason::NoToken => "no_token",
            DenyReason::Token(e) => e.reason(),
        }
    }
}

/// Allow/Deny decision with the identity context handed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub principal: String,
    pub effect: Effect,
    pub resource: String,
    pub context: BTreeMap<String, String>,
    pub denial: Option<DenyReason>,
}

impl AuthorizationDecision {
    pub fn allow<I>(principal: impl Into<String>, resource: impl Into<String>, context: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            principal: principal.into(),
            effect: Effect::Allow,
            resource: resource.into(),
            context: coerce_context(context),
            denial: None,
        }
    }

    pub fn deny(reason: DenyReason, resource: impl Into<String>) -> Self {
        let context = BTreeMap::from([("reason".to_string(), reason.code().to_string())]);

        Self {
            principal: ANONYMOUS_PRINCIPAL.to_string(),
            effect: Effect::Deny,
            resource: resource.into(),
            context,
            denial: Some(reason),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }

    /// Render the policy document consumed by the enforcement boundary.
    pub fn to_policy(&self) -> PolicyResponse {
        PolicyResponse {
            principal_id: self.principal.clone(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION,
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION,
                    effect: self.effect,
                    resource: self.resource.clone(),
                }],
            },
            context: self.context.clone(),
        }
    }
}

/// Coerce context values to strings; null becomes the empty string.
pub fn coerce_context<I>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, Value)>,
{
    values
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: &'static str,
    pub effect: Effect,
    pub resource: String,
}
