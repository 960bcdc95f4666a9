//! Claims carried by the access tokens this service issues.
//!
//! Registered claims that the service relies on are named fields; anything
//! application-specific goes into `CustomClaims`, which refuses registered
//! names so a custom value can never override `exp` or `jti`.
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claim names owned by the token service or by the JWT registry.
pub const RESERVED_CLAIMS: &[&str] = &["exp", "iat", "nbf", "jti", "sub", "iss", "aud"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("claim name is reserved: {0}")]
    Reserved(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl From<&str> for ClaimValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for ClaimValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for ClaimValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomClaims(BTreeMap<String, ClaimValue>);

impl CustomClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Result<(), ClaimsError> {
        let name = name.into();
        if RESERVED_CLAIMS.contains(&name.as_str()) {
            return Err(ClaimsError::Reserved(name));
        }
        self.0.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ClaimValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

/// Caller-supplied part of a token; the service adds `exp`, `iat`, `iss`
/// and (with replay tracking) `jti`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClaims {
    pub sub: Option<String>,
    pub custom: CustomClaims,
}

impl NewClaims {
    pub fn for_subject(sub: impl Into<String>) -> Self {
        Self {
            sub: Some(sub.into()),
            custom: CustomClaims::new(),
        }
    }

    pub fn with_claim(
        mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Result<Self, ClaimsError> {
        self.custom.insert(name, value)?;
        Ok(self)
    }
}

/// Claims as issued, and as recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    // NumericDate (seconds since epoch)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(flatten)]
    pub custom: CustomClaims,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
