//! Comment repository trait and abstractions
//!
//! The engine only talks to storage through [`CommentRepository`]. An
//! implementation must make `save` a compare-and-swap on the comment's
//! version and `delete_subtree` all-or-nothing.

pub mod memory;

use crate::comment::{Comment, Venue};
use crate::error::Result;
use crate::page::{Page, PageRequest};
use crate::types::{CommentId, DisciplineKey, ProfessorKey};
use std::cmp::Reverse;

pub use memory::{MemoryRepository, StoreSnapshot};

/// Filter over root comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootFilter {
    /// Every root comment
    All,
    /// Roots flagged by the alarm heuristic
    Alarming,
    /// Roots escalated by community reports
    Reported,
    /// Roots on one venue; `professor: None` selects general discipline comments
    Venue(Venue),
}

impl RootFilter {
    pub fn venue(discipline: DisciplineKey, professor: Option<ProfessorKey>) -> Self {
        RootFilter::Venue(Venue::new(discipline, professor))
    }

    /// Whether `comment` passes this filter (replies never do)
    pub fn matches(&self, comment: &Comment) -> bool {
        if !comment.is_root() {
            return false;
        }
        match self {
            RootFilter::All => true,
            RootFilter::Alarming => comment.is_alarming(),
            RootFilter::Reported => comment.is_reported(),
            RootFilter::Venue(venue) => comment.venue() == Some(venue),
        }
    }

    /// Order results the way this filter is listed
    ///
    /// Reported roots go by report count, then newest first; everything
    /// else newest first. Ties fall back to the higher id.
    pub fn sort(&self, comments: &mut [Comment]) {
        match self {
            RootFilter::Reported => comments.sort_by_key(|c| {
                (Reverse(c.report_count()), Reverse(c.created_at()), Reverse(c.id()))
            }),
            _ => comments.sort_by_key(|c| (Reverse(c.created_at()), Reverse(c.id()))),
        }
    }
}

/// Trait for comment storage implementations
pub trait CommentRepository: Send + Sync {
    /// Reserve a fresh comment id
    fn next_id(&self) -> Result<CommentId>;

    /// Store a new comment and return it as stored
    ///
    /// Fails with `ParentNotFound` when a reply's parent is gone and with
    /// `Validation` when the id is taken.
    fn insert(&self, comment: Comment) -> Result<Comment>;

    /// Load a comment by id
    fn load(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Replace a stored comment if its version still matches
    ///
    /// Returns the stored copy with the bumped version, `StaleVersion` when
    /// another writer got there first, `CommentNotFound` when it was deleted.
    fn save(&self, comment: &Comment) -> Result<Comment>;

    /// Delete a comment and every descendant as one unit
    ///
    /// Returns the number of removed comments, `0` when `id` is absent.
    fn delete_subtree(&self, id: CommentId) -> Result<usize>;

    /// Direct replies of `id`, in insertion order
    fn children(&self, id: CommentId) -> Result<Vec<Comment>>;

    /// Number of transitive replies below `id`
    fn count_descendants(&self, id: CommentId) -> Result<usize>;

    /// All roots matching `filter`, ordered per [`RootFilter::sort`]
    fn find_roots(&self, filter: &RootFilter) -> Result<Vec<Comment>>;

    /// One page of roots matching `filter`
    fn page_roots(&self, filter: &RootFilter, request: PageRequest) -> Result<Page<Comment>> {
        let all = self.find_roots(filter)?;
        Ok(Page::from_ordered(all, request))
    }

    /// Number of roots matching `filter`
    fn count_roots(&self, filter: &RootFilter) -> Result<u64> {
        Ok(self.find_roots(filter)?.len() as u64)
    }

    /// Check if a comment exists
    fn exists(&self, id: CommentId) -> Result<bool> {
        Ok(self.load(id)?.is_some())
    }
}
