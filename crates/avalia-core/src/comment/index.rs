//! Parent → children index over a comment arena
//!
//! Comments only know their parent. Children lists live here, built and
//! maintained by the repository layer.

use super::model::Comment;
use crate::types::CommentId;
use std::collections::{HashMap, VecDeque};

/// Children of each comment, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ChildIndex {
    by_parent: HashMap<CommentId, Vec<CommentId>>,
}

impl ChildIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        if let Some(parent) = comment.parent_id() {
            self.by_parent.entry(parent).or_default().push(comment.id());
        }
    }

    /// Remove a comment (and its own children list) from the index
    pub fn remove(&mut self, comment: &Comment) {
        if let Some(parent) = comment.parent_id() {
            if let Some(ids) = self.by_parent.get_mut(&parent) {
                ids.retain(|id| *id != comment.id());
                if ids.is_empty() {
                    self.by_parent.remove(&parent);
                }
            }
        }
        self.by_parent.remove(&comment.id());
    }

    /// Direct replies of `id`
    pub fn children_of(&self, id: CommentId) -> &[CommentId] {
        self.by_parent.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: CommentId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Number of transitive replies below `id`
    pub fn count_descendants(&self, id: CommentId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let children = self.children_of(current);
            count += children.len();
            stack.extend_from_slice(children);
        }
        count
    }

    /// `id` followed by all its descendants, breadth first
    pub fn subtree(&self, id: CommentId) -> Vec<CommentId> {
        let mut ids = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            ids.push(current);
            queue.extend(self.children_of(current).iter().copied());
        }
        ids
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.by_parent.clear();
    }

    /// Rebuild index from a collection of comments
    ///
    /// Comments should be given in id order so children keep insertion order.
    pub fn rebuild(&mut self, comments: impl IntoIterator<Item = impl std::borrow::Borrow<Comment>>) {
        self.clear();
        for comment in comments {
            self.add(comment.borrow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DisciplineKey, UserKey};

    fn root(id: u64) -> Comment {
        Comment::create(
            CommentId(id),
            UserKey::new("ana@unb.br"),
            "raiz",
            Some(DisciplineKey::new("CIC0004")),
            None,
            None,
        )
        .unwrap()
    }

    fn reply(id: u64, parent: u64) -> Comment {
        Comment::create(
            CommentId(id),
            UserKey::new("bia@unb.br"),
            "resposta",
            None,
            None,
            Some(CommentId(parent)),
        )
        .unwrap()
    }

    fn sample_index() -> ChildIndex {
        // 1 ─┬─ 2 ── 4
        //    └─ 3
        let mut index = ChildIndex::new();
        index.rebuild([root(1), reply(2, 1), reply(3, 1), reply(4, 2)]);
        index
    }

    #[test]
    fn test_children_in_insertion_order() {
        let index = sample_index();
        assert_eq!(index.children_of(CommentId(1)), &[CommentId(2), CommentId(3)]);
        assert!(index.children_of(CommentId(3)).is_empty());
    }

    #[test]
    fn test_count_descendants() {
        let index = sample_index();
        assert_eq!(index.count_descendants(CommentId(1)), 3);
        assert_eq!(index.count_descendants(CommentId(2)), 1);
        assert_eq!(index.count_descendants(CommentId(4)), 0);
    }

    #[test]
    fn test_subtree_is_breadth_first() {
        let index = sample_index();
        assert_eq!(
            index.subtree(CommentId(1)),
            vec![CommentId(1), CommentId(2), CommentId(3), CommentId(4)]
        );
    }

    #[test]
    fn test_deep_thread_does_not_overflow() {
        let mut index = ChildIndex::new();
        index.add(&root(1));
        for id in 2..=100_000u64 {
            index.add(&reply(id, id - 1));
        }
        assert_eq!(index.count_descendants(CommentId(1)), 99_999);
        assert_eq!(index.subtree(CommentId(50_000)).len(), 50_001);
    }

    #[test]
    fn test_remove() {
        let mut index = sample_index();
        index.remove(&reply(3, 1));
        assert_eq!(index.children_of(CommentId(1)), &[CommentId(2)]);

        index.remove(&reply(2, 1));
        assert!(!index.has_children(CommentId(1)));
        assert!(!index.has_children(CommentId(2)));
    }

    #[test]
    fn test_clear() {
        let mut index = sample_index();
        index.clear();
        assert_eq!(index.count_descendants(CommentId(1)), 0);
    }
}
