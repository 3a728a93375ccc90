//! Error types for avalia

use crate::types::{CommentId, Operation, UserKey};
use thiserror::Error;

/// Main error type for avalia
#[derive(Debug, Error)]
pub enum AvaliaError {
    /// Malformed input: blank text, contradictory placement, bad page size
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced comment does not exist
    #[error("Comment not found: {id} (during {operation})")]
    CommentNotFound { id: CommentId, operation: Operation },

    /// Parent of a reply does not exist
    #[error("Parent comment not found: {0}")]
    ParentNotFound(CommentId),

    /// Caller is neither the author nor an admin
    #[error("Forbidden: {caller} may not {operation} comment {comment}")]
    Forbidden {
        operation: Operation,
        comment: CommentId,
        caller: UserKey,
    },

    /// Concurrent mutation kept winning after all retries
    #[error("Conflict: {operation} on comment {comment} gave up after {attempts} attempts")]
    Conflict {
        operation: Operation,
        comment: CommentId,
        attempts: u32,
    },

    /// A save carried an outdated version
    #[error("Stale version for comment {id}: expected {expected}, found {found}")]
    StaleVersion { id: CommentId, expected: u64, found: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AvaliaError>,
    },
}

impl AvaliaError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AvaliaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error means a referenced comment is missing
    pub fn is_not_found(&self) -> bool {
        match self {
            AvaliaError::CommentNotFound { .. } | AvaliaError::ParentNotFound(_) => true,
            AvaliaError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Whether the read-modify-write that produced this error may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, AvaliaError::StaleVersion { .. })
    }
}

impl From<toml::de::Error> for AvaliaError {
    fn from(err: toml::de::Error) -> Self {
        AvaliaError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for AvaliaError {
    fn from(err: toml::ser::Error) -> Self {
        AvaliaError::Toml(err.to_string())
    }
}

/// Result type alias for avalia
pub type Result<T> = std::result::Result<T, AvaliaError>;
