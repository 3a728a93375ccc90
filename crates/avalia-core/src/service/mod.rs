//! Comment engine services

pub mod comments;
pub mod thread;

pub use comments::CommentService;
pub use thread::ThreadNode;
