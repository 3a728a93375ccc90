//! Admin moderation queries
//!
//! Read-only. Only root comments are listed; replies are reached through
//! their thread.

use crate::comment::Comment;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::page::{Page, PageRequest};
use crate::repository::{CommentRepository, RootFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root comment counts for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationStats {
    pub total: u64,
    pub alarming: u64,
    pub reported: u64,
}

/// Paginated feeds over root comments
pub struct ModerationQueries {
    repository: Arc<dyn CommentRepository>,
    config: QueryConfig,
}

impl ModerationQueries {
    pub fn new(repository: Arc<dyn CommentRepository>, config: QueryConfig) -> Self {
        Self { repository, config }
    }

    /// Page request with the configured default size, capped at the maximum
    pub fn page_request(&self, page: usize, size: Option<usize>) -> Result<PageRequest> {
        let size = size
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        PageRequest::new(page, size)
    }

    /// Every root, newest first
    pub fn list_all_roots(&self, page: usize, size: Option<usize>) -> Result<Page<Comment>> {
        let request = self.page_request(page, size)?;
        self.repository.page_roots(&RootFilter::All, request)
    }

    /// Alarming roots, newest first
    pub fn list_alarming(&self, page: usize, size: Option<usize>) -> Result<Page<Comment>> {
        let request = self.page_request(page, size)?;
        self.repository.page_roots(&RootFilter::Alarming, request)
    }

    /// Reported roots, most reported first
    pub fn list_reported(&self) -> Result<Vec<Comment>> {
        self.repository.find_roots(&RootFilter::Reported)
    }

    pub fn count_all(&self) -> Result<u64> {
        self.repository.count_roots(&RootFilter::All)
    }

    pub fn count_alarming(&self) -> Result<u64> {
        self.repository.count_roots(&RootFilter::Alarming)
    }

    pub fn stats(&self) -> Result<ModerationStats> {
        Ok(ModerationStats {
            total: self.count_all()?,
            alarming: self.count_alarming()?,
            reported: self.repository.count_roots(&RootFilter::Reported)?,
        })
    }
}
