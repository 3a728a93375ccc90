//! Comment validation

use crate::config::CommentConfig;
use crate::error::{AvaliaError, Result};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Validator for comment text
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn from_config(config: &CommentConfig) -> Self {
        Self::with_max_length(config.max_length)
    }

    /// Validate comment text
    ///
    /// Blank text is rejected; the length limit applies to the text as
    /// stored, surrounding whitespace included.
    pub fn validate_content(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(AvaliaError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }

        // Counted in characters, accented letters are common here
        if content.chars().count() > self.max_length {
            return Err(AvaliaError::Validation(format!(
                "Comment text exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
