//! Viewer-relative thread views

use crate::comment::{Comment, VoteState};
use crate::error::{AvaliaError, Result};
use crate::repository::CommentRepository;
use crate::types::{CommentId, UserKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A comment with its replies, as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadNode {
    pub comment: Comment,
    pub author_initials: String,
    /// The viewer wrote this comment
    pub is_owner: bool,
    pub viewer_vote: VoteState,
    /// Always `false` for stored comments; deleted ones are never returned
    pub deleted: bool,
    /// Transitive reply count
    pub reply_count: usize,
    /// Direct replies, oldest first
    pub replies: Vec<ThreadNode>,
}

impl ThreadNode {
    fn leaf(comment: Comment, viewer: Option<&UserKey>) -> Self {
        let (is_owner, viewer_vote) = match viewer {
            Some(user) => (comment.is_authored_by(user), comment.has_voted(user)),
            None => (false, VoteState::None),
        };
        Self {
            author_initials: comment.author().initials(),
            comment,
            is_owner,
            viewer_vote,
            deleted: false,
            reply_count: 0,
            replies: Vec::new(),
        }
    }

    pub fn id(&self) -> CommentId {
        self.comment.id()
    }

    /// Viewer vote as `1`, `-1` or `0`
    pub fn viewer_vote_value(&self) -> i8 {
        self.viewer_vote.as_i8()
    }

    /// Visit this node and its replies depth first, with their depth
    pub fn walk(&self) -> Vec<(usize, &ThreadNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for reply in node.replies.iter().rev() {
                stack.push((depth + 1, reply));
            }
        }
        out
    }
}

impl Drop for ThreadNode {
    // Flatten the tree first so deep threads do not exhaust the stack
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.replies);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.replies);
        }
    }
}

/// Materialise the thread under `root` without recursion
///
/// Comments are collected breadth first, then assembled from the deepest
/// level up so every node's replies are complete before it is attached.
pub(crate) fn build_thread(
    repository: &dyn CommentRepository,
    root: Comment,
    viewer: Option<&UserKey>,
) -> Result<ThreadNode> {
    let root_id = root.id();
    let mut order = Vec::new();
    let mut child_ids: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    let mut pending: HashMap<CommentId, ThreadNode> = HashMap::new();

    let mut queue = VecDeque::from([root]);
    while let Some(comment) = queue.pop_front() {
        let id = comment.id();
        let children = repository.children(id)?;
        child_ids.insert(id, children.iter().map(Comment::id).collect());
        queue.extend(children);
        order.push(id);
        pending.insert(id, ThreadNode::leaf(comment, viewer));
    }

    for id in order.iter().rev() {
        let replies: Vec<ThreadNode> = child_ids
            .remove(id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| pending.remove(&child))
            .collect();
        if let Some(node) = pending.get_mut(id) {
            node.reply_count = replies.iter().map(|r| 1 + r.reply_count).sum();
            node.replies = replies;
        }
    }

    pending
        .remove(&root_id)
        .ok_or_else(|| AvaliaError::Storage(format!("Thread {} vanished while building", root_id)))
}
