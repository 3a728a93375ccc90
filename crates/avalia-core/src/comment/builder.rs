//! Comment builder for fluent API

use super::model::{Comment, Placement, Venue};
use crate::error::{AvaliaError, Result};
use crate::types::{CommentId, DisciplineKey, ProfessorKey, UserKey};
use chrono::{DateTime, Utc};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    author: UserKey,
    text: Option<String>,
    discipline: Option<DisciplineKey>,
    professor: Option<ProfessorKey>,
    parent: Option<CommentId>,
    created_at: Option<DateTime<Utc>>,
}

impl CommentBuilder {
    /// Create a new builder for a comment by `author`
    pub fn new(author: UserKey) -> Self {
        Self {
            author,
            text: None,
            discipline: None,
            professor: None,
            parent: None,
            created_at: None,
        }
    }

    /// Builder for a root comment on a venue
    pub fn root(author: UserKey, discipline: DisciplineKey, professor: Option<ProfessorKey>) -> Self {
        let mut builder = Self::new(author).discipline(discipline);
        builder.professor = professor;
        builder
    }

    /// Builder for a reply
    pub fn reply(author: UserKey, parent: CommentId) -> Self {
        Self::new(author).parent(parent)
    }

    /// Set the comment text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn discipline(mut self, discipline: DisciplineKey) -> Self {
        self.discipline = Some(discipline);
        self
    }

    pub fn professor(mut self, professor: ProfessorKey) -> Self {
        self.professor = Some(professor);
        self
    }

    pub fn parent(mut self, parent: CommentId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Override the creation time (imports, tests)
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Check text and placement without consuming the builder
    pub fn validate(&self) -> Result<()> {
        match self.text.as_deref() {
            None => {
                return Err(AvaliaError::Validation(
                    "Comment text is required".to_string(),
                ))
            }
            Some(text) if text.trim().is_empty() => {
                return Err(AvaliaError::Validation(
                    "Comment text cannot be empty".to_string(),
                ))
            }
            Some(_) => {}
        }

        match (&self.discipline, &self.parent) {
            (Some(_), Some(_)) => Err(AvaliaError::Validation(
                "A comment cannot have both a discipline and a parent".to_string(),
            )),
            (None, None) => Err(AvaliaError::Validation(
                "A comment needs either a discipline or a parent".to_string(),
            )),
            (None, Some(_)) if self.professor.is_some() => Err(AvaliaError::Validation(
                "Replies inherit their professor from the parent".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Build the comment with the id assigned by the repository
    pub fn build(self, id: CommentId) -> Result<Comment> {
        self.validate()?;

        let placement = match (self.discipline, self.parent) {
            (Some(discipline), None) => Placement::Root(Venue::new(discipline, self.professor)),
            (None, Some(parent)) => Placement::Reply { parent },
            _ => {
                return Err(AvaliaError::Validation(
                    "A comment needs exactly one of a discipline or a parent".to_string(),
                ))
            }
        };
        let text = self.text.unwrap_or_default();
        let created_at = self.created_at.unwrap_or_else(Utc::now);

        Ok(Comment::from_parts(id, self.author, text, placement, created_at))
    }
}
