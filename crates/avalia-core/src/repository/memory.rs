//! In-memory comment repository
//!
//! An arena of comments keyed by id plus the parent → children index, behind
//! one `RwLock`. Every write happens under the write lock, which makes the
//! version check in `save` and the cascade in `delete_subtree` atomic.

use super::{CommentRepository, RootFilter};
use crate::comment::{ChildIndex, Comment};
use crate::error::{AvaliaError, Result};
use crate::types::{CommentId, Operation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Serializable image of a repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Next id to hand out
    pub next_id: u64,
    /// All comments, in id order
    pub comments: Vec<Comment>,
}

#[derive(Debug, Default)]
struct Store {
    comments: BTreeMap<CommentId, Comment>,
    children: ChildIndex,
    next_id: u64,
}

impl Store {
    fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut comments = BTreeMap::new();
        for comment in snapshot.comments {
            comment.check_invariants()?;
            let id = comment.id();
            if comments.insert(id, comment).is_some() {
                return Err(AvaliaError::Storage(format!("Duplicate comment id {}", id)));
            }
        }

        for comment in comments.values() {
            if let Some(parent) = comment.parent_id() {
                if !comments.contains_key(&parent) {
                    return Err(AvaliaError::Storage(format!(
                        "Comment {} points to missing parent {}",
                        comment.id(),
                        parent
                    )));
                }
            }
        }

        let mut children = ChildIndex::new();
        children.rebuild(comments.values());

        let highest = comments.keys().next_back().map(|id| id.get()).unwrap_or(0);
        Ok(Self {
            comments,
            children,
            next_id: snapshot.next_id.max(highest + 1).max(1),
        })
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.next_id,
            comments: self.comments.values().cloned().collect(),
        }
    }
}

/// Thread-safe in-memory repository
#[derive(Debug)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                next_id: 1,
                ..Store::default()
            }),
        }
    }

    /// Restore from a snapshot, checking every comment and parent link
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        Ok(Self {
            store: RwLock::new(Store::from_snapshot(snapshot)?),
        })
    }

    /// Copy the current state
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.read().snapshot()
    }

    /// Replace the whole state with `snapshot`
    pub fn restore(&self, snapshot: StoreSnapshot) -> Result<()> {
        let store = Store::from_snapshot(snapshot)?;
        *self.store.write() = store;
        Ok(())
    }

    /// Total number of stored comments, replies included
    pub fn len(&self) -> usize {
        self.store.read().comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().comments.is_empty()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentRepository for MemoryRepository {
    fn next_id(&self) -> Result<CommentId> {
        let mut store = self.store.write();
        let id = CommentId(store.next_id);
        store.next_id += 1;
        Ok(id)
    }

    fn insert(&self, mut comment: Comment) -> Result<Comment> {
        let mut store = self.store.write();
        let id = comment.id();

        if store.comments.contains_key(&id) {
            return Err(AvaliaError::Validation(format!(
                "Comment with ID {} already exists",
                id
            )));
        }
        if let Some(parent) = comment.parent_id() {
            if !store.comments.contains_key(&parent) {
                return Err(AvaliaError::ParentNotFound(parent));
            }
        }

        comment.stamp_version(1);
        store.children.add(&comment);
        store.comments.insert(id, comment.clone());
        if id.get() >= store.next_id {
            store.next_id = id.get() + 1;
        }
        debug!("Inserted comment {}", id);
        Ok(comment)
    }

    fn load(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.store.read().comments.get(&id).cloned())
    }

    fn save(&self, comment: &Comment) -> Result<Comment> {
        let mut store = self.store.write();
        let id = comment.id();

        let stored = store
            .comments
            .get_mut(&id)
            .ok_or(AvaliaError::CommentNotFound {
                id,
                operation: Operation::Load,
            })?;

        if stored.version() != comment.version() {
            return Err(AvaliaError::StaleVersion {
                id,
                expected: comment.version(),
                found: stored.version(),
            });
        }
        if stored.parent_id() != comment.parent_id() {
            return Err(AvaliaError::Validation(format!(
                "Comment {} cannot change its parent",
                id
            )));
        }

        let mut updated = comment.clone();
        updated.stamp_version(comment.version() + 1);
        *stored = updated.clone();
        debug!("Saved comment {} at version {}", id, updated.version());
        Ok(updated)
    }

    fn delete_subtree(&self, id: CommentId) -> Result<usize> {
        let mut store = self.store.write();
        if !store.comments.contains_key(&id) {
            return Ok(0);
        }

        let ids = store.children.subtree(id);
        for removed_id in &ids {
            if let Some(removed) = store.comments.remove(removed_id) {
                store.children.remove(&removed);
            }
        }
        debug!("Deleted comment {} with {} descendants", id, ids.len() - 1);
        Ok(ids.len())
    }

    fn children(&self, id: CommentId) -> Result<Vec<Comment>> {
        let store = self.store.read();
        Ok(store
            .children
            .children_of(id)
            .iter()
            .filter_map(|child| store.comments.get(child).cloned())
            .collect())
    }

    fn count_descendants(&self, id: CommentId) -> Result<usize> {
        Ok(self.store.read().children.count_descendants(id))
    }

    fn find_roots(&self, filter: &RootFilter) -> Result<Vec<Comment>> {
        let mut roots: Vec<Comment> = self
            .store
            .read()
            .comments
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        filter.sort(&mut roots);
        Ok(roots)
    }

    fn count_roots(&self, filter: &RootFilter) -> Result<u64> {
        let store = self.store.read();
        Ok(store.comments.values().filter(|c| filter.matches(c)).count() as u64)
    }

    fn exists(&self, id: CommentId) -> Result<bool> {
        Ok(self.store.read().comments.contains_key(&id))
    }
}
