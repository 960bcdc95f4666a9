use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which part of the store hierarchy the service answers for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeOption {
    /// Every store of every website.
    #[default]
    Default,
    Website(String),
    Group(i64),
    Store(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid scope option {0:?} (expected default, website:<code>, group:<id> or store:<code>)")]
pub struct ParseScopeError(String);

impl FromStr for ScopeOption {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }

        let invalid = || ParseScopeError(s.to_string());
        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid());
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "website" => Ok(Self::Website(value.to_string())),
            "group" => value.parse().map(Self::Group).map_err(|_| invalid()),
            "store" => Ok(Self::Store(value.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ScopeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Website(code) => write!(f, "website:{code}"),
            Self::Group(id) => write!(f, "group:{id}"),
            Self::Store(code) => write!(f, "store:{code}"),
        }
    }
}
