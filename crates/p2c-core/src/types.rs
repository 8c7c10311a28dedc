//! Core identifier types for papers2code

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of a document-store object id in hex characters
pub const OBJECT_ID_LEN: usize = 24;

fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Canonical form of a paper source used for id derivation
///
/// For URLs only the scheme and host are case-folded. Bare identifiers
/// (arXiv ids, DOIs) are case-insensitive and folded entirely.
pub fn normalize_source(source: &str) -> String {
    let source = source.trim();
    let Some((scheme, rest)) = source.split_once("://") else {
        return source.to_lowercase();
    };

    let host_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let (host, tail) = rest.split_at(host_end);
    format!("{}://{}{}", scheme.to_lowercase(), host.to_lowercase(), tail)
}

/// Unique identifier for a paper
/// Format: 24 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaperId(String);

impl PaperId {
    /// Derive a stable id from a paper source (URL, arXiv id, DOI)
    ///
    /// URL paths and queries keep their case; see [`normalize_source`].
    pub fn from_source(source: &str) -> Self {
        let hash = blake3::hash(normalize_source(source).as_bytes());
        PaperId(hash.to_hex()[..OBJECT_ID_LEN].to_string())
    }

    /// Parse and validate a paper id
    pub fn parse(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        if is_object_id(&s) {
            Ok(PaperId(s))
        } else {
            Err(crate::ModerationError::Validation(format!(
                "Invalid paper ID format: {}",
                s
            )))
        }
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PaperId {
    type Error = crate::ModerationError;

    fn try_from(s: String) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl From<PaperId> for String {
    fn from(id: PaperId) -> Self {
        id.0
    }
}

/// Unique identifier for a user
/// Format: 24 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a user id
    pub fn parse(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        if is_object_id(&s) {
            Ok(UserId(s))
        } else {
            Err(crate::ModerationError::Validation(format!(
                "Invalid user ID format: {}",
                s
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = crate::ModerationError;

    fn try_from(s: String) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Unique identifier for a vote record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub Uuid);

impl ActionId {
    /// Generate a new ActionId
    pub fn new() -> Self {
        ActionId(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
