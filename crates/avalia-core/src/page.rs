//! Pagination types for admin feeds

use crate::error::{AvaliaError, Result};
use serde::{Deserialize, Serialize};

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(AvaliaError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    /// Index of the first element on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: usize,
    pub size: usize,
}

impl<T> Page<T> {
    /// Cut a page out of the complete, already ordered result set
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let content: Vec<T> = all
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self::new(content, total as u64, request)
    }

    /// Build a page from content already cut by the backend
    pub fn new(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        let size = request.size as u64;
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            current_page: request.page,
            size: request.size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        (self.current_page as u64 + 1) < self.total_pages
    }

    /// Transform the content, keeping page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            current_page: self.current_page,
            size: self.size,
        }
    }
}
