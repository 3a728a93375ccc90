//! Core type definitions for avalia

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a comment
///
/// Assigned by the repository on insertion and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl CommentId {
    /// Get the raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CommentId {
    fn from(value: u64) -> Self {
        CommentId(value)
    }
}

impl std::str::FromStr for CommentId {
    type Err = crate::AvaliaError;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(CommentId)
            .map_err(|_| crate::AvaliaError::Validation(format!("Invalid comment ID: {}", s)))
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a user (the login e-mail in practice)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(pub String);

impl UserKey {
    /// Create a user key, normalising surrounding whitespace
    pub fn new(s: impl Into<String>) -> Self {
        UserKey(s.into().trim().to_string())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-letter initials taken from the local part of the key
    ///
    /// `"joao@unb.br"` gives `"JO"`, a one-letter local part gives one letter,
    /// and an empty key gives `"?"`.
    pub fn initials(&self) -> String {
        let local = self.0.split('@').next().unwrap_or_default();
        let initials: String = local.chars().take(2).collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials.to_uppercase()
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discipline code (e.g. `"CIC0004"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisciplineKey(pub String);

impl DisciplineKey {
    pub fn new(s: impl Into<String>) -> Self {
        DisciplineKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisciplineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Professor identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessorKey(pub String);

impl ProfessorKey {
    pub fn new(s: impl Into<String>) -> Self {
        ProfessorKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Regular student account
    User,
    /// Administrator with moderation rights
    Admin,
}

/// An authenticated caller, as resolved by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub key: UserKey,
    pub role: Role,
}

impl Actor {
    /// A regular user
    pub fn user(key: impl Into<String>) -> Self {
        Self {
            key: UserKey::new(key),
            role: Role::User,
        }
    }

    /// An administrator
    pub fn admin(key: impl Into<String>) -> Self {
        Self {
            key: UserKey::new(key),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Engine operation, carried in errors for caller context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Post,
    Reply,
    Edit,
    Vote,
    Report,
    Delete,
    MarkSafe,
    BanAuthor,
    Load,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Post => "post",
            Operation::Reply => "reply",
            Operation::Edit => "edit",
            Operation::Vote => "vote",
            Operation::Report => "report",
            Operation::Delete => "delete",
            Operation::MarkSafe => "mark-safe",
            Operation::BanAuthor => "ban-author",
            Operation::Load => "load",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol version for stored data compatibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Check if this version is compatible with another version
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }

    /// Parse a `"major.minor"` string
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V1_0
    }
}
