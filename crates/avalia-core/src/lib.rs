//! avalia-core - Comment engine for the avalia course review platform
//!
//! Threaded comments on disciplines and professors, per-user votes, community
//! reports with escalation, the alarm heuristic, and the admin moderation
//! workflow. Storage is reached through the [`repository::CommentRepository`]
//! trait and account bans through [`ban::AccountBanService`].

pub mod ban;
pub mod comment;
pub mod config;
pub mod error;
pub mod moderation;
pub mod page;
pub mod repository;
pub mod service;
pub mod types;

pub use error::{AvaliaError, Result};
pub use types::*;
